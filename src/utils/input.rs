use std::io;
use std::io::Write;

use crate::error::{Result, TimetableError};
use crate::model::section::Section;

pub fn input(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?; // make sure the prompt shows before blocking on stdin

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Resolves what the user typed against the known sections: either a listed id or a 1-based
/// position in the list.
pub fn parse_section_choice(choice: &str, sections: &[Section]) -> Option<Section> {
    let choice = choice.trim();
    if choice.is_empty() {
        return None;
    }
    if let Some(section) = sections.iter().find(|s| s.to_string() == choice) {
        return Some(section.clone());
    }
    if let Some(section) = choice
        .strip_prefix('#')
        .and_then(|n| n.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| sections.get(index))
    {
        return Some(section.clone());
    }
    None
}

/// Lists `sections` and asks for one until the answer matches.
pub fn select_section(sections: &[Section]) -> io::Result<Option<Section>> {
    if sections.is_empty() {
        return Ok(None);
    }
    println!("Available sections:");
    for (index, section) in sections.iter().enumerate() {
        println!("  #{:<3} Section {}", index + 1, section);
    }
    loop {
        let answer = input("Select a section (id or #position, empty to cancel): ")?;
        if answer.is_empty() {
            return Ok(None);
        }
        match parse_section_choice(&answer, sections) {
            Some(section) => return Ok(Some(section)),
            None => println!("Unknown section: {}", answer),
        }
    }
}

/// The picked section, or [`TimetableError::SectionRequired`] when the prompt was cancelled.
pub fn require_section(choice: Option<Section>) -> Result<Section> {
    choice.ok_or(TimetableError::SectionRequired)
}
