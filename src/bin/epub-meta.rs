//! epub-meta - print EPUB metadata and table of contents

use std::process::ExitCode;

use clap::Parser;

use epub_meta::{Epub, ExtractOptions, Metadata};

#[derive(Parser)]
#[command(name = "epub-meta")]
#[command(version, about = "Extract EPUB metadata and table of contents", long_about = None)]
#[command(after_help = "EXAMPLES:
    epub-meta book.epub              Show metadata and chapters
    epub-meta book.epub --json       Print metadata as JSON
    epub-meta book.epub --chapter 0  Print the first chapter's file")]
struct Cli {
    /// Input EPUB file
    #[arg(value_name = "INPUT")]
    input: String,

    /// Print metadata as JSON
    #[arg(short, long)]
    json: bool,

    /// Print the raw content of the chapter at this index
    #[arg(short, long, value_name = "N")]
    chapter: Option<usize>,

    /// Reject archives whose mimetype entry is wrong
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let options = ExtractOptions::default().strict_mimetype(cli.strict);
    let mut epub = Epub::open_with(&cli.input, options).map_err(|e| e.to_string())?;

    if let Some(index) = cli.chapter {
        let chapter = epub
            .chapters()
            .get(index)
            .cloned()
            .ok_or_else(|| format!("no chapter {index} ({} chapters)", epub.chapters().len()))?;
        let content = epub.chapter_content(&chapter).map_err(|e| e.to_string())?;
        print!("{content}");
        return Ok(());
    }

    if cli.json {
        let json = serde_json::to_string_pretty(epub.metadata()).map_err(|e| e.to_string())?;
        println!("{json}");
    } else {
        show_info(&cli.input, epub.metadata());
    }
    Ok(())
}

fn show_info(path: &str, meta: &Metadata) {
    println!("File: {path}");
    if let Some(ref title) = meta.title {
        println!("Title: {title}");
    }
    if !meta.creators.is_empty() {
        println!("Creators: {}", meta.creators.join(", "));
    }
    if let Some(ref language) = meta.language {
        println!("Language: {language}");
    }
    if let Some(ref publisher) = meta.publisher {
        println!("Publisher: {publisher}");
    }
    if let Some(ref id) = meta.primary_identifier {
        println!("Identifier: {id}");
    }
    if let Some(date) = meta.date {
        println!("Date: {}", date.format("%Y-%m-%d"));
    }
    if let Some(modified) = meta.modified {
        println!("Modified: {}", modified.to_rfc3339());
    }
    if let Some(ref series) = meta.series {
        match meta.series_index {
            Some(index) => println!("Series: {series} #{index}"),
            None => println!("Series: {series}"),
        }
    }
    if !meta.tags.is_empty() {
        println!("Tags: {}", meta.tags.join(", "));
    }
    if let Some(words) = meta.words {
        println!("Words: {words}");
    }
    if let Some(ref status) = meta.status {
        println!("Status: {status}");
    }
    if let Some(ref desc) = meta.description {
        let desc = desc.trim();
        match desc.char_indices().nth(200) {
            Some((end, _)) => println!("Description: {}...", &desc[..end]),
            None => println!("Description: {desc}"),
        }
    }

    println!("Chapters: {}", meta.toc.len());
    for (i, chapter) in meta.toc.iter().enumerate() {
        println!("  {i:>3}. {} ({})", chapter.title, chapter.path);
    }
}
