pub trait StripCodeBlock {
    fn strip_code_block(&self) -> &str;
}

impl StripCodeBlock for str {
    /// Unwraps a markdown fenced block (with or without a language tag).
    /// Text that is not fenced comes back trimmed.
    fn strip_code_block(&self) -> &str {
        let trimmed = self.trim();
        if let Some(rest) = trimmed.strip_prefix("```") {
            let inner = match rest.find('\n') {
                Some(pos) => &rest[pos + 1..],
                None => rest,
            };
            let inner = match inner.find("```") {
                Some(end) => &inner[..end],
                None => inner,
            };
            return inner.trim();
        }
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_block() {
        assert_eq!("```json\n{\"a\": 1}\n```".strip_code_block(), "{\"a\": 1}");
        assert_eq!("```\n[1]\n```\ntrailing".strip_code_block(), "[1]");
        assert_eq!("  {\"a\": 1}  ".strip_code_block(), "{\"a\": 1}");
    }
}
