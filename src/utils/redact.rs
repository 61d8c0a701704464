// Address redaction for screenshots and shared output
// Teaching material rarely needs full addresses: a role label or a truncated
// form is enough to follow the money

use serde::{Deserialize, Serialize};

pub const DEFAULT_VISIBLE_START: usize = 6;
pub const DEFAULT_VISIBLE_END: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressRole {
    Sender,
    Recipient,
    Change,
}

// "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq" -> "bc1qar...wf5mdq"
pub fn truncate_address(address: &str, start_chars: usize, end_chars: usize) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= start_chars + end_chars {
        return address.to_string();
    }
    let head: String = chars[..start_chars].iter().collect();
    let tail: String = chars[chars.len() - end_chars..].iter().collect();
    format!("{head}...{tail}")
}

// Senders are lettered (A, B, C...), recipients numbered from the second one
pub fn address_label(role: AddressRole, index: usize) -> String {
    match role {
        AddressRole::Sender => {
            let letter = u32::try_from(index)
                .ok()
                .and_then(|i| char::from_u32(u32::from(b'A') + i))
                .unwrap_or('?');
            format!("Sender {letter}")
        }
        AddressRole::Change => "Change".to_string(),
        AddressRole::Recipient if index == 0 => "Recipient".to_string(),
        AddressRole::Recipient => format!("Recipient {}", index + 1),
    }
}

// A label wins unless the full address was asked for
pub fn redact_address(address: &str, show_full: bool, label: Option<&str>) -> String {
    match (show_full, label) {
        (true, _) => address.to_string(),
        (false, Some(label)) => label.to_string(),
        (false, None) => truncate_address(address, DEFAULT_VISIBLE_START, DEFAULT_VISIBLE_END),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq";

    #[test]
    fn test_truncate_address() {
        assert_eq!(truncate_address(ADDRESS, 6, 6), "bc1qar...wf5mdq");
        assert_eq!(truncate_address(ADDRESS, 4, 2), "bc1q...dq");
        // Exactly start + end characters: unchanged
        assert_eq!(truncate_address("abcdefghijkl", 6, 6), "abcdefghijkl");
        assert_eq!(truncate_address("", 6, 6), "");
    }

    #[test]
    fn test_address_labels() {
        assert_eq!(address_label(AddressRole::Sender, 0), "Sender A");
        assert_eq!(address_label(AddressRole::Sender, 2), "Sender C");
        assert_eq!(address_label(AddressRole::Change, 5), "Change");
        assert_eq!(address_label(AddressRole::Recipient, 0), "Recipient");
        assert_eq!(address_label(AddressRole::Recipient, 1), "Recipient 2");
    }

    #[test]
    fn test_redact_address() {
        assert_eq!(redact_address(ADDRESS, true, Some("Sender A")), ADDRESS);
        assert_eq!(redact_address(ADDRESS, false, Some("Sender A")), "Sender A");
        assert_eq!(redact_address(ADDRESS, false, None), "bc1qar...wf5mdq");
    }
}
