//! Accessor naming.
//!
//! The compiler does not pick accessor names itself; it binds whatever names
//! this module yields. A property is reachable by its schema name and by a
//! snake_case alias, and a list property additionally gets singular element
//! accessors derived from the singularized property name.

/// Plural endings that the suffix rules get wrong, with their singular form.
///
/// Matched against the end of the name, so `DomainAliases` becomes
/// `DomainAlias`.
const IRREGULAR: &[(&str, &str)] = &[
    ("Aliases", "Alias"),
    ("Analyses", "Analysis"),
    ("Approaches", "Approach"),
    ("Buses", "Bus"),
    ("Children", "Child"),
    ("Criteria", "Criterion"),
    ("Indices", "Index"),
    ("Indexes", "Index"),
    ("Matrices", "Matrix"),
    ("Movies", "Movie"),
    ("People", "Person"),
    ("Reaches", "Reach"),
    ("Speeches", "Speech"),
    ("Statuses", "Status"),
    ("Touches", "Touch"),
    ("Vertices", "Vertex"),
];

/// Returns every accessor name for the schema name `name`.
///
/// The schema name itself comes first, followed by its snake_case alias
/// when that differs.
///
/// ```
/// use stratus_schema::naming::method_names;
///
/// assert_eq!(method_names("VPCId"), vec!["VPCId", "vpc_id"]);
/// assert_eq!(method_names("key"), vec!["key"]);
/// ```
pub fn method_names(name: &str) -> Vec<String> {
    let snake = snake_case(name);
    if snake == name {
        vec![name.to_string()]
    } else {
        vec![name.to_string(), snake]
    }
}

/// Converts a PascalCase or camelCase name to snake_case.
///
/// Runs of capitals are treated as one acronym word, so `VPCId` becomes
/// `vpc_id` and `SSEAlgorithm` becomes `sse_algorithm`. Characters that
/// cannot appear in an identifier become underscores.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut snake = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !snake.is_empty() && !snake.ends_with('_') {
                snake.push('_');
            }
            continue;
        }

        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary && !snake.is_empty() && !snake.ends_with('_') {
                snake.push('_');
            }
        }
        snake.push(c.to_ascii_lowercase());
    }

    while snake.ends_with('_') {
        snake.pop();
    }
    snake
}

/// Returns the singular form of the plural property name `name`.
///
/// ```
/// use stratus_schema::naming::singularize;
///
/// assert_eq!(singularize("SecurityGroups"), "SecurityGroup");
/// assert_eq!(singularize("Policies"), "Policy");
/// assert_eq!(singularize("Addresses"), "Address");
/// assert_eq!(singularize("Access"), "Access");
/// ```
pub fn singularize(name: &str) -> String {
    for (plural, singular) in IRREGULAR {
        if let Some(stem) = name.strip_suffix(plural) {
            return format!("{stem}{singular}");
        }
    }

    if let Some(stem) = name.strip_suffix("ies").filter(|stem| !stem.is_empty()) {
        return format!("{stem}y");
    }

    for suffix in ["sses", "xes", "shes"] {
        if name.ends_with(suffix) {
            return name[..name.len() - 2].to_string();
        }
    }

    // `Branches` and `Matches` drop `es`, `Caches` and `Niches` only `s`.
    if let Some(stem) = name.strip_suffix("ches") {
        let after_vowel = stem
            .chars()
            .last()
            .is_some_and(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'));
        return if after_vowel {
            format!("{stem}che")
        } else {
            format!("{stem}ch")
        };
    }

    if name.ends_with("ss") || name.ends_with("us") || name.ends_with("is") {
        return name.to_string();
    }

    match name.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_snake_case_acronyms() {
        assert_eq!(snake_case("ImageId"), "image_id");
        assert_eq!(snake_case("VPCId"), "vpc_id");
        assert_eq!(snake_case("CPUCredits"), "cpu_credits");
        assert_eq!(snake_case("SSEAlgorithm"), "sse_algorithm");
        assert_eq!(snake_case("Ipv6Addresses"), "ipv6_addresses");
        assert_eq!(snake_case("S3Bucket"), "s3_bucket");
        assert_eq!(snake_case("ARN"), "arn");
    }

    #[test]
    fn test_snake_case_separators() {
        assert_eq!(snake_case("Content-Type"), "content_type");
        assert_eq!(snake_case("a.b"), "a_b");
        assert_eq!(snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn test_singularize_rules() {
        assert_eq!(singularize("Tags"), "Tag");
        assert_eq!(singularize("Policies"), "Policy");
        assert_eq!(singularize("Boxes"), "Box");
        assert_eq!(singularize("Branches"), "Branch");
        assert_eq!(singularize("Matches"), "Match");
        assert_eq!(singularize("Caches"), "Cache");
        assert_eq!(singularize("CacheNiches"), "CacheNiche");
        assert_eq!(singularize("Hashes"), "Hash");
        assert_eq!(singularize("Addresses"), "Address");
        assert_eq!(singularize("Access"), "Access");
        assert_eq!(singularize("Status"), "Status");
        assert_eq!(singularize("Keys"), "Key");
        assert_eq!(singularize("Metadata"), "Metadata");
        assert_eq!(singularize("s"), "s");
    }

    #[test]
    fn test_singularize_irregular() {
        assert_eq!(singularize("DomainAliases"), "DomainAlias");
        assert_eq!(singularize("Statuses"), "Status");
        assert_eq!(singularize("GlobalSecondaryIndexes"), "GlobalSecondaryIndex");
        assert_eq!(singularize("RetryApproaches"), "RetryApproach");
    }

    proptest! {
        #[test]
        fn prop_regular_plurals_round_trip(stem in "[A-Z][a-z]{1,8}[bdfgkmnprt]") {
            let plural = format!("{stem}s");
            prop_assert_eq!(singularize(&plural), stem);
        }

        #[test]
        fn prop_method_names_start_with_schema_name(name in "[A-Z][A-Za-z0-9]{0,16}") {
            let names = method_names(&name);
            prop_assert_eq!(&names[0], &name);
            prop_assert!(names.len() <= 2);
        }

        #[test]
        fn prop_snake_case_is_lowercase_identifier(name in "[A-Za-z][A-Za-z0-9]{0,16}") {
            let snake = snake_case(&name);
            prop_assert!(snake.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
            prop_assert!(!snake.starts_with('_'));
            prop_assert!(!snake.ends_with('_'));
            prop_assert!(!snake.contains("__"));
        }
    }
}
