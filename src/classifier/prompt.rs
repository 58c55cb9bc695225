use super::ClassificationInput;
use crate::categories::Category;
use std::fmt::Write;

pub const SYSTEM_PROMPT: &str = "You are a tender classification assistant. Classify tenders into one of the provided categories. Respond with only the category name.";

/// User message for one tender. Absent optional fields are left out entirely.
pub fn build_prompt(input: &ClassificationInput) -> String {
    let mut prompt = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        prompt,
        "Classify the following government tender into exactly one of these categories:"
    );
    let _ = writeln!(prompt, "{}", Category::joined_labels());
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Tender Details:");
    let _ = writeln!(prompt, "Title: {}", input.title);
    if let Some(department) = input.department() {
        let _ = writeln!(prompt, "Department: {department}");
    }
    if let Some(item_category) = input.item_category() {
        let _ = writeln!(prompt, "Item Category: {item_category}");
    }
    let _ = writeln!(prompt);
    prompt.push_str("Respond with ONLY the category name, nothing else.");
    prompt
}
