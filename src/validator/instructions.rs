use crate::config::InstructionPolicy;
use crate::error::ValidationError;
use log::debug;

/// One instruction line, split into its number (if any) and text
#[derive(Debug, PartialEq, Eq)]
struct Step<'a> {
    number: Option<usize>,
    text: &'a str,
}

/// Bring an instruction block into the "1. a\n2. b\n" shape.
///
/// Blank lines are dropped. With [`InstructionPolicy::Renumber`] steps keep
/// their order and get new numbers; with [`InstructionPolicy::Reject`] any
/// missing, repeated or out-of-order number is an error.
pub fn normalize_steps(
    instructions: &str,
    policy: InstructionPolicy,
) -> Result<String, ValidationError> {
    let steps: Vec<Step> = instructions
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_step)
        .filter(|step| !step.text.is_empty())
        .collect();

    if let Some((position, step)) = steps
        .iter()
        .enumerate()
        .find(|(i, step)| step.number != Some(i + 1))
    {
        let problem = match step.number {
            Some(n) => format!("step {} is numbered {}", position + 1, n),
            None => format!("step {} has no number", position + 1),
        };
        match policy {
            InstructionPolicy::Reject => {
                return Err(ValidationError::InstructionFormatError(problem))
            }
            InstructionPolicy::Renumber => debug!("Renumbering instructions: {}", problem),
        }
    }

    Ok(steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}\n", i + 1, step.text))
        .collect())
}

/// Split a leading "12. " or "12) " off a line.
/// The marker must be followed by whitespace, so "2.5 kg" stays a quantity.
fn parse_step(line: &str) -> Step<'_> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        let marked = rest
            .strip_prefix(&['.', ')'][..])
            .filter(|text| text.is_empty() || text.starts_with(char::is_whitespace));
        if let Some(text) = marked {
            if let Ok(number) = line[..digits].parse() {
                return Step {
                    number: Some(number),
                    text: text.trim(),
                };
            }
        }
    }

    Step {
        number: None,
        text: line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_is_kept() {
        let text = "1. Boil pasta.\n2. Drain.\n";
        assert_eq!(
            normalize_steps(text, InstructionPolicy::Reject).unwrap(),
            text
        );
    }

    #[test]
    fn test_trailing_newline_added() {
        assert_eq!(
            normalize_steps("1. Boil.\n2. Stir.", InstructionPolicy::Reject).unwrap(),
            "1. Boil.\n2. Stir.\n"
        );
    }

    #[test]
    fn test_out_of_order_renumbered_in_content_order() {
        assert_eq!(
            normalize_steps("2. Stir.\n1. Boil.\n", InstructionPolicy::Renumber).unwrap(),
            "1. Stir.\n2. Boil.\n"
        );
    }

    #[test]
    fn test_out_of_order_rejected_under_strict_policy() {
        assert_eq!(
            normalize_steps("2. Stir.\n1. Boil.\n", InstructionPolicy::Reject),
            Err(ValidationError::InstructionFormatError(
                "step 1 is numbered 2".to_string()
            ))
        );
    }

    #[test]
    fn test_gaps_and_missing_numbers_renumbered() {
        let text = "1. Chop.\n\n3. Fry.\nServe hot.\n";
        assert_eq!(
            normalize_steps(text, InstructionPolicy::Renumber).unwrap(),
            "1. Chop.\n2. Fry.\n3. Serve hot.\n"
        );
        assert!(matches!(
            normalize_steps(text, InstructionPolicy::Reject),
            Err(ValidationError::InstructionFormatError(_))
        ));
    }

    #[test]
    fn test_paren_numbers_and_windows_newlines() {
        assert_eq!(
            normalize_steps("1) Boil.\r\n2) Stir.\r\n", InstructionPolicy::Reject).unwrap(),
            "1. Boil.\n2. Stir.\n"
        );
    }

    #[test]
    fn test_leading_quantity_is_not_a_step_number() {
        let step = parse_step("200 g of pasta into the pot");
        assert_eq!(step.number, None);
        assert_eq!(step.text, "200 g of pasta into the pot");
    }

    #[test]
    fn test_decimal_quantity_is_not_a_step_number() {
        let step = parse_step("2.5 kg of it goes in the pot.");
        assert_eq!(step.number, None);
        assert_eq!(step.text, "2.5 kg of it goes in the pot.");

        let text = "1. Season the beef.\n2.5 kg of it goes in the pot.\n";
        assert_eq!(
            normalize_steps(text, InstructionPolicy::Renumber).unwrap(),
            "1. Season the beef.\n2. 2.5 kg of it goes in the pot.\n"
        );
        assert_eq!(
            normalize_steps(text, InstructionPolicy::Reject),
            Err(ValidationError::InstructionFormatError(
                "step 2 has no number".to_string()
            ))
        );
    }

    #[test]
    fn test_empty_instructions() {
        assert_eq!(normalize_steps("", InstructionPolicy::Reject).unwrap(), "");
        assert_eq!(normalize_steps("\n\n", InstructionPolicy::Renumber).unwrap(), "");
    }
}
