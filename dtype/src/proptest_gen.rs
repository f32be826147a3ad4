use crate::*;
use proptest::prelude::*;

/// Randomize the ASCII case of every character.
fn mixed_case(base: &'static str) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), base.len()).prop_map(move |upper| {
        base.chars().zip(upper).map(|(c, up)| if up { c.to_ascii_uppercase() } else { c }).collect()
    })
}

impl ScalarType {
    /// Type strings a kernel may report for this scalar type: the prefix in
    /// random case followed by an arbitrary suffix.
    pub fn type_string_generator(self) -> impl Strategy<Value = String> {
        (mixed_case(self.prefix()), "[ a-zA-Z0-9()*]{0,12}").prop_map(|(head, tail)| head + &tail)
    }
}

impl ElementType {
    /// Type strings that classify as supported.
    pub fn supported_string_generator() -> impl Strategy<Value = String> {
        prop_oneof![ScalarType::Float64.type_string_generator(), ScalarType::Int32.type_string_generator()]
    }

    /// Type strings that start with neither supported prefix.
    pub fn unsupported_string_generator() -> impl Strategy<Value = String> {
        "[ -~]{0,16}".prop_filter("must not match a supported prefix", |s| {
            let lower = s.to_lowercase();
            !lower.starts_with("double") && !lower.starts_with("int")
        })
    }
}
