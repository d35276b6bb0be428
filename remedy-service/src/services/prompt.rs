//! Summary prompt assembly.

use crate::models::RemedyLookup;
use std::fmt::Write;

/// Build the summary prompt for a remedy lookup.
///
/// Every interpolated value is either a normalized identifier or a stored
/// record, so the prompt never contains raw request text.
pub fn build_summary_prompt(lookup: &RemedyLookup) -> String {
    let mut prompt = format!(
        "Generate a comprehensive herbal remedy summary for {} using this data:\n\n",
        lookup.disease
    );

    let _ = writeln!(prompt, "**Description**: {}", lookup.description);
    prompt.push('\n');
    prompt.push_str("**Recommended Herbal Remedies**:\n");

    if lookup.remedies.is_empty() {
        prompt.push_str("- No remedies on record\n");
    }
    for remedy in &lookup.remedies {
        let _ = writeln!(
            prompt,
            "- **{}**: {} ({})",
            remedy.herb_name, remedy.preparation, remedy.dosage
        );
        if let Some(notes) = remedy.safety_notes() {
            let _ = writeln!(prompt, "  - Safety Notes: {}", notes);
        }
    }

    prompt.push_str(
        "\nInclude key safety considerations and format the response using markdown with clear sections.",
    );
    prompt
}
