/// Frameworks a vanilla submission must not declare.
pub const DEFAULT_DENIED: [&str; 5] = ["react", "vue", "@angular/core", "nuxt", "next"];

/// Ordered set of prohibited package names.
///
/// Order is significant: the first entry that matches a manifest is the one
/// reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenyList(Vec<String>);

impl DenyList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !list.contains(&name) {
                list.push(name);
            }
        }
        Self(list)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for DenyList {
    fn default() -> Self {
        Self::new(DEFAULT_DENIED)
    }
}
