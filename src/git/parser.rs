/// A change classification reported by `git status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    Modified,
    Deleted,
    NewFile,
}

/// Recognized categories and the label git prints for each, in match priority order
pub const STATUS_LABELS: [(StatusCategory, &str); 3] = [
    (StatusCategory::Modified, "modified"),
    (StatusCategory::Deleted, "deleted"),
    (StatusCategory::NewFile, "new file"),
];

impl StatusCategory {
    /// Stable identifier: `modified`, `deleted` or `new_file`
    pub fn key(self) -> &'static str {
        match self {
            StatusCategory::Modified => "modified",
            StatusCategory::Deleted => "deleted",
            StatusCategory::NewFile => "new_file",
        }
    }

    /// Text git prints in front of the path
    pub fn label(self) -> &'static str {
        STATUS_LABELS
            .iter()
            .find(|(category, _)| *category == self)
            .map(|(_, label)| *label)
            .unwrap_or_default()
    }
}

/// Paths reported by one `git status` call, grouped by category.
///
/// Paths keep the order in which they appeared in the output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    modified: Vec<String>,
    deleted: Vec<String>,
    new_file: Vec<String>,
}

impl StatusReport {
    pub fn modified(&self) -> &[String] {
        &self.modified
    }

    pub fn deleted(&self) -> &[String] {
        &self.deleted
    }

    pub fn new_file(&self) -> &[String] {
        &self.new_file
    }

    /// Paths recorded under `category`
    pub fn get(&self, category: StatusCategory) -> &[String] {
        match category {
            StatusCategory::Modified => &self.modified,
            StatusCategory::Deleted => &self.deleted,
            StatusCategory::NewFile => &self.new_file,
        }
    }

    /// All categories in fixed order, including empty ones
    pub fn iter(&self) -> impl Iterator<Item = (StatusCategory, &[String])> {
        STATUS_LABELS
            .iter()
            .map(move |(category, _)| (*category, self.get(*category)))
    }

    /// True when no category holds a path
    pub fn is_clean(&self) -> bool {
        self.iter().all(|(_, paths)| paths.is_empty())
    }

    fn push(&mut self, category: StatusCategory, path: String) {
        match category {
            StatusCategory::Modified => self.modified.push(path),
            StatusCategory::Deleted => self.deleted.push(path),
            StatusCategory::NewFile => self.new_file.push(path),
        }
    }
}

/// Parse the long-format output of `git status`.
///
/// A line contributes a path when it contains `"<label>: "` for one of
/// [`STATUS_LABELS`]; the first label in table order wins and the trimmed rest of
/// the line is the path. The match is not anchored, so indentation and other
/// prefixes are tolerated. Unrecognized lines (headers, hints, blank lines) are
/// skipped without error, so a wording change in git drops entries silently.
pub fn parse_status(output: &str) -> StatusReport {
    let mut report = StatusReport::default();

    for line in output.lines() {
        let matched = STATUS_LABELS.iter().find_map(|(category, label)| {
            let pattern = format!("{}: ", label);
            line.find(&pattern)
                .map(|index| (*category, index + pattern.len()))
        });

        if let Some((category, start)) = matched {
            report.push(category, line[start..].trim().to_string());
        }
    }

    report
}
