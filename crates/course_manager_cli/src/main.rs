//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `course_manager_core` linkage against the SQLite backend.
//! - Print one page of a seeded demo catalog: `course_manager_cli [page] [size]`.
//! - Write rolling logs when `COURSE_MANAGER_LOG_DIR` names an absolute directory.

use course_manager_core::{
    core_version, default_log_level, init_logging, AuthorRepository, ContextAuthorRepository,
    ContextBuilder, Country, NewAuthor, SqliteDbBuilder,
};
use std::error::Error;

const DEMO_AUTHORS: &[(&str, &str, Option<&str>)] = &[
    ("Kevin", "Dockx", None),
    ("Gill", "Cleeren", None),
    ("Julie", "Lerman", Some("US")),
    ("Shawn", "Wildermuth", None),
    ("Deborah", "Kurata", Some("US")),
];

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let page_number = parse_arg(args.next(), 1)?;
    let page_size = parse_arg(args.next(), 3)?;

    if let Ok(log_dir) = std::env::var("COURSE_MANAGER_LOG_DIR") {
        init_logging(default_log_level(), &log_dir)?;
    }

    println!("course_manager_core version={}", core_version());

    let builder = SqliteDbBuilder::new()?;
    {
        let mut context = builder.build_context()?;
        context.add_country(Country::new("BE", "Belgium"))?;
        context.add_country(Country::new("US", "United States of America"))?;
        let mut repo = ContextAuthorRepository::new(&mut context);
        for (first_name, last_name, country) in DEMO_AUTHORS.iter().copied() {
            let mut author = NewAuthor::new(last_name).with_first_name(first_name);
            author.country_id = country.map(str::to_string);
            repo.add_author(author)?;
        }
        repo.save_changes()?;
    }

    let mut context = builder.build_context()?;
    let repo = ContextAuthorRepository::new(&mut context);
    for author in repo.get_authors(page_number, page_size)? {
        println!("{} ({}) {}", author.display_name(), author.country_id, author.id);
    }

    Ok(())
}

fn parse_arg(value: Option<String>, default: u32) -> Result<u32, Box<dyn Error>> {
    match value {
        Some(text) => Ok(text.parse()?),
        None => Ok(default),
    }
}
