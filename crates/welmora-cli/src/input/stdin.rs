use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Text piped on stdin, or `None` when stdin is a terminal.
pub fn piped_text() -> io::Result<Option<String>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(Some(buffer))
}

/// Deserialise a plan from raw text. Blank text is no plan, so flags apply.
pub fn parse_plan<T: DeserializeOwned>(
    source: &str,
    text: &str,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| format!("Invalid plan on {source}: {e}").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use welmora_core::amortization::planner::{LoanGoal, LoanPlanInput};

    #[test]
    fn test_blank_pipe_is_no_plan() {
        let plan: Option<LoanPlanInput> = parse_plan("stdin", "  \n").unwrap();
        assert!(plan.is_none());
    }

    #[test]
    fn test_parses_plan() {
        let plan: Option<LoanPlanInput> =
            parse_plan("stdin", r#"{"goal": "rate", "principal": 100000, "installment": 5000}"#)
                .unwrap();
        assert_eq!(plan.map(|p| p.goal), Some(LoanGoal::Rate));
    }

    #[test]
    fn test_bad_json_names_source() {
        let err = parse_plan::<LoanPlanInput>("stdin", "{not json").unwrap_err();
        assert!(err.to_string().starts_with("Invalid plan on stdin"));
    }
}
