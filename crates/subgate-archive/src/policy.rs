use subgate_manifest::DenyList;

pub const PROHIBITED_DIR: &str = "node_modules";
pub const ENTRY_POINT_SUFFIX: &str = ".html";
pub const MANIFEST_NAME: &str = "package.json";

/// Checks applied to every entry while an archive is extracted.
#[derive(Clone, Debug)]
pub struct Policy {
    pub prohibited_dir: String,
    pub entry_point_suffix: String,
    pub manifest_name: String,
    pub deny_list: DenyList,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            prohibited_dir: PROHIBITED_DIR.to_string(),
            entry_point_suffix: ENTRY_POINT_SUFFIX.to_string(),
            manifest_name: MANIFEST_NAME.to_string(),
            deny_list: DenyList::default(),
        }
    }
}

impl Policy {
    pub fn prohibited_dir(mut self, segment: impl Into<String>) -> Self {
        self.prohibited_dir = segment.into();
        self
    }

    pub fn entry_point_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.entry_point_suffix = suffix.into();
        self
    }

    pub fn manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    pub fn deny_list(mut self, deny_list: DenyList) -> Self {
        self.deny_list = deny_list;
        self
    }

    /// True when any `/`- or `\`-separated segment equals the prohibited name.
    pub fn is_prohibited(&self, entry_name: &str) -> bool {
        entry_name
            .split(['/', '\\'])
            .any(|segment| segment == self.prohibited_dir)
    }

    pub fn is_entry_point(&self, entry_name: &str) -> bool {
        entry_name.ends_with(&self.entry_point_suffix)
    }

    pub fn is_manifest(&self, entry_name: &str) -> bool {
        entry_name.ends_with(&self.manifest_name)
    }
}
