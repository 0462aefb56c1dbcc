//! Binary entrypoint for fa-subset-cli.

fn main() {
    match fa_subset_cli::run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    }
}
