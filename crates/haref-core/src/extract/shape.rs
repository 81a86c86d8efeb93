//! Lexical shape checks for reference values

fn is_id_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

fn is_domain(segment: &str) -> bool {
    segment.starts_with(|c: char| c.is_ascii_lowercase()) && segment.chars().all(is_id_char)
}

/// `domain.object_id`: exactly one dot, lowercase letters, digits and
/// underscores, domain starting with a letter
pub fn is_entity_id(value: &str) -> bool {
    match value.split_once('.') {
        Some((domain, object_id)) => {
            is_domain(domain) && !object_id.is_empty() && object_id.chars().all(is_id_char)
        }
        None => false,
    }
}

/// `domain.service`: exactly one dot, both segments non-empty
pub fn is_service_shaped(value: &str) -> bool {
    match value.split_once('.') {
        Some((domain, service)) => {
            !domain.is_empty() && !service.is_empty() && !service.contains('.')
        }
        None => false,
    }
}

/// Entity registry id: 32 lowercase hex characters
pub fn is_registry_id(value: &str) -> bool {
    value.len() == 32 && value.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}

/// Contains an expression (`{{ }}`) or statement (`{% %}`) region
pub fn is_template(value: &str) -> bool {
    contains_pair(value, "{{", "}}") || contains_pair(value, "{%", "%}")
}

fn contains_pair(value: &str, open: &str, close: &str) -> bool {
    value
        .find(open)
        .is_some_and(|start| value[start + open.len()..].contains(close))
}
