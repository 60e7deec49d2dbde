use clap::Parser;
use std::path::PathBuf;

use crate::args::CliArgs;

#[test]
fn parses_positional_sources() {
    let args = CliArgs::parse_from(["typeshift", "a.js", "b.js"]);
    assert_eq!(args.files, vec![PathBuf::from("a.js"), PathBuf::from("b.js")]);
    assert_eq!(args.output, PathBuf::from("."));
    assert!(!args.debug);
}

#[test]
fn parses_output_dir_short_flag() {
    let args = CliArgs::parse_from(["typeshift", "-o", "out", "a.js"]);
    assert_eq!(args.output, PathBuf::from("out"));
}

#[test]
fn parses_repeated_externs_and_convert() {
    let args = CliArgs::parse_from([
        "typeshift",
        "--externs",
        "e1.js",
        "--externs",
        "e2.js",
        "--convert",
        "a.js",
        "a.js",
        "b.js",
    ]);
    assert_eq!(args.externs.len(), 2);
    assert_eq!(args.convert, vec![PathBuf::from("a.js")]);
    assert_eq!(args.files.len(), 2);
}

#[test]
fn externs_map_accepts_both_spellings() {
    let camel = CliArgs::parse_from(["typeshift", "--externsMap", "m.json", "a.js"]);
    assert_eq!(camel.externs_map, Some(PathBuf::from("m.json")));
    let kebab = CliArgs::parse_from(["typeshift", "--externs-map", "m.json", "a.js"]);
    assert_eq!(kebab.externs_map, Some(PathBuf::from("m.json")));
}
