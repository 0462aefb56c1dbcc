use super::*;
use clap::CommandFactory;

fn parse(argv: &[&str]) -> BuildArgs {
    let cli = Cli::try_parse_from(argv).expect("parse cli");
    let Command::Build(args) = cli.command;
    args
}

fn styles_of(request: SubsetRequest) -> IndexMap<String, Vec<String>> {
    match request {
        SubsetRequest::Styles(map) => map,
        SubsetRequest::Icons(_) => panic!("CLI requests are always style maps"),
    }
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn bare_icon_names_land_in_the_solid_style() {
    let args = parse(&["fa-subset", "build", "-o", "/tmp/out", "plus", "minus"]);
    let map = styles_of(build_request(&args).expect("build request"));

    assert_eq!(map.len(), 1);
    assert_eq!(map["solid"], ["plus", "minus"]);
}

#[test]
fn prefixed_icons_pick_their_style() {
    let args = parse(&[
        "fa-subset",
        "build",
        "-o",
        "/tmp/out",
        "brands:github",
        "sharp-solid:camera",
        "plus",
    ]);
    let map = styles_of(build_request(&args).expect("build request"));

    assert_eq!(map["brands"], ["github"]);
    assert_eq!(map["sharp-solid"], ["camera"]);
    assert_eq!(map["solid"], ["plus"]);
}

#[test]
fn request_file_merges_with_positional_icons() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let file = tmp.path().join("request.yml");
    fs::write(&file, "regular:\n  - bell\nsolid:\n  - user\n").expect("write request");

    let mut args = parse(&["fa-subset", "build", "-o", "/tmp/out", "plus"]);
    args.file = Some(file);
    let map = styles_of(build_request(&args).expect("build request"));

    assert_eq!(map["regular"], ["bell"]);
    assert_eq!(map["solid"], ["user", "plus"], "file entries come first");
}

#[test]
fn flat_request_file_defaults_to_solid() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let file = tmp.path().join("request.yml");
    fs::write(&file, "- plus\n- minus\n").expect("write request");

    let args = Cli::try_parse_from([
        "fa-subset",
        "build",
        "-o",
        "/tmp/out",
        "--file",
        file.to_str().expect("utf8 path"),
    ])
    .expect("parse cli");
    let Command::Build(args) = args.command;
    let map = styles_of(build_request(&args).expect("build request"));

    assert_eq!(map["solid"], ["plus", "minus"]);
}

#[test]
fn icons_are_required_without_a_request_file() {
    let parse = Cli::try_parse_from(["fa-subset", "build", "-o", "/tmp/out"]);
    assert!(parse.is_err());
}

#[test]
fn malformed_icon_arguments_are_rejected() {
    let args = parse(&["fa-subset", "build", "-o", "/tmp/out", ":plus"]);
    assert!(build_request(&args).is_err());

    let args = parse(&["fa-subset", "build", "-o", "/tmp/out", "solid:"]);
    assert!(build_request(&args).is_err());
}

#[test]
fn format_list_parses_with_delimiter() {
    let args = parse(&[
        "fa-subset",
        "build",
        "-o",
        "/tmp/out",
        "-F",
        "woff,woff2,ttf",
        "plus",
    ]);
    assert_eq!(
        args.formats,
        [FormatArg::Woff, FormatArg::Woff2, FormatArg::Ttf]
    );
}

#[test]
fn formats_default_to_woff2_and_ttf() {
    let args = parse(&["fa-subset", "build", "-o", "/tmp/out", "plus"]);
    assert_eq!(args.formats, [FormatArg::Woff2, FormatArg::Ttf]);
    assert_eq!(args.package, PackageArg::Free);
    assert!(!args.json);
}
