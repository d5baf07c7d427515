//! Debug tool to inspect generated `.pptx` deck archives.
//!
//! Usage:
//!   `cargo run --bin dump_deck -- <file.pptx>`
//!   `cargo run --bin dump_deck -- <file.pptx> --slide N`
//!
//! Lists the archive's parts, or dumps one slide's XML for debugging
//! layout issues.

// Development/debug binary - allow expect/unwrap for simpler error handling
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::env;
use std::io::Read;
use std::path::Path;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <file.pptx> [--slide N]", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    let file = fs_err::File::open(path).unwrap_or_else(|e| {
        eprintln!("Failed to open {}: {e}", path.display());
        std::process::exit(1);
    });
    let mut archive = zip::ZipArchive::new(file).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {e}", path.display());
        std::process::exit(1);
    });

    if let Some(position) = args.iter().position(|a| a == "--slide") {
        let number: usize = args
            .get(position + 1)
            .and_then(|n| n.parse().ok())
            .unwrap_or_else(|| {
                eprintln!("--slide requires a slide number");
                std::process::exit(1);
            });
        dump_slide(&mut archive, number);
    } else {
        list_parts(&mut archive);
    }
}

fn list_parts(archive: &mut zip::ZipArchive<fs_err::File>) {
    println!("{} parts:", archive.len());
    let mut names: Vec<String> = (0..archive.len())
        .filter_map(|i| archive.by_index(i).ok().map(|f| {
            format!("{:>9}  {}", f.size(), f.name())
        }))
        .collect();
    names.sort();
    for name in names {
        println!("  {name}");
    }
}

fn dump_slide(archive: &mut zip::ZipArchive<fs_err::File>, number: usize) {
    let part = format!("ppt/slides/slide{number}.xml");
    let mut file = archive.by_name(&part).unwrap_or_else(|_| {
        eprintln!("No such part: {part}");
        std::process::exit(1);
    });
    let mut content = String::new();
    file.read_to_string(&mut content).expect("slide XML is UTF-8");
    // Crude pretty-printing: one element per line.
    println!("{}", content.replace("><", ">\n<"));
}
