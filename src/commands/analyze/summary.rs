use colored::Colorize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Outcome of one analyze run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub analyzed: usize,
    pub skipped: usize,
    pub needs_review: usize,
    pub pgml_blocks_sampled: usize,
    pub out_dir: PathBuf,
    pub reports: Vec<PathBuf>,
}

impl RunSummary {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
            ..Default::default()
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "pg-analyze summary".bold())?;
        writeln!(f, "  files analyzed:  {}", self.analyzed.to_string().green())?;
        let skipped = if self.skipped > 0 {
            self.skipped.to_string().yellow()
        } else {
            self.skipped.to_string().normal()
        };
        writeln!(f, "  files skipped:   {}", skipped)?;
        writeln!(f, "  needs review:    {}", self.needs_review)?;
        if self.pgml_blocks_sampled > 0 {
            writeln!(f, "  pgml blocks:     {}", self.pgml_blocks_sampled)?;
        }
        write!(f, "  reports:         {}", self.out_dir.display())
    }
}

pub fn print_summary(summary: &RunSummary) {
    println!("{summary}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lists_counts() {
        colored::control::set_override(false);
        let summary = RunSummary {
            analyzed: 3,
            skipped: 1,
            needs_review: 2,
            ..RunSummary::new(Path::new("out"))
        };
        let text = summary.to_string();
        assert!(text.contains("files analyzed:  3"));
        assert!(text.contains("files skipped:   1"));
        assert!(text.contains("needs review:    2"));
        assert!(text.ends_with("reports:         out"));
        assert!(!text.contains("pgml blocks"));
    }
}
