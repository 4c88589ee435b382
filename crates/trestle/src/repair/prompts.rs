//! Prompt templates for the repair service.

/// Build the repair prompt, embedding the raw text verbatim.
pub fn repair_prompt(raw_text: &str) -> String {
    format!(
        r#"The following text was supposed to be structured tabular data but could not
be parsed as JSON or as a delimited table.

## Input
{raw_text}

## Task
Rewrite the input as valid, parseable data:
- If it resembles a list of objects or key/value pairs, output a JSON array of
  flat objects (one object per row, string or number values only).
- Otherwise output CSV with a header row on the first line.
- Preserve every value exactly as written; fix structure only (delimiters,
  quoting, brackets, line breaks). Do not invent, drop, or reorder data.
- Output the corrected data and nothing else: no explanation, no surrounding
  prose, no markdown fences."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_raw_text_verbatim() {
        let raw = "name age\nJohn 30 // broken";
        let prompt = repair_prompt(raw);

        assert!(prompt.contains(raw));
        assert!(prompt.contains("CSV"));
    }
}
