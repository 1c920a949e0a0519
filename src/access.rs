/// Occupations access policy of a space: nobody, or anyone in at least one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    Nobody,
    AnyOf(Vec<String>),
}

impl AccessPolicy {
    pub fn or(self, group_id: &str) -> Self {
        match self {
            AccessPolicy::Nobody => AccessPolicy::AnyOf(vec![group_id.to_string()]),
            AccessPolicy::AnyOf(mut groups) => {
                if !groups.iter().any(|g| g == group_id) {
                    groups.push(group_id.to_string());
                }
                AccessPolicy::AnyOf(groups)
            }
        }
    }

    /// Union of the given groups, skipping nulls.
    pub fn union<'a, I>(groups: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        groups
            .into_iter()
            .flatten()
            .fold(AccessPolicy::Nobody, AccessPolicy::or)
    }

    pub fn groups(&self) -> &[String] {
        match self {
            AccessPolicy::Nobody => &[],
            AccessPolicy::AnyOf(groups) => groups,
        }
    }

    /// Stored form: `NULL` for nobody, otherwise the group ids joined with `" | "`.
    pub fn to_expression(&self) -> Option<String> {
        match self {
            AccessPolicy::Nobody => None,
            AccessPolicy::AnyOf(groups) => Some(groups.join(" | ")),
        }
    }
}
