//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the Agora CLI.

use crate::research::Report;
use crate::WorkerSpec;
use owo_colors::OwoColorize;

const BANNER: [&str; 5] = [
    r"    _    ____  ___  ____      _    ",
    r"   / \  / ___|/ _ \|  _ \    / \   ",
    r"  / _ \| |  _| | | | |_) |  / _ \  ",
    r" / ___ \ |_| | |_| |  _ <  / ___ \ ",
    r"/_/   \_\____|\___/|_| \_\/_/   \_\",
];

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the Agora banner
    pub fn banner(&self) {
        if self.colored {
            println!();
            for (i, line) in BANNER.iter().enumerate() {
                if i < 2 {
                    println!("   {}", line.bright_cyan().bold());
                } else if i < 3 {
                    println!("   {}", line.cyan().bold());
                } else {
                    println!("   {}", line.blue().bold());
                }
            }
            println!(
                "\n   {} {}\n",
                "Multi-Source Research Team".bright_white().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!();
            for line in BANNER {
                println!("   {}", line);
            }
            println!(
                "\n   Multi-Source Research Team v{}\n",
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print the research roster, one worker per block
    pub fn roster(&self, roster: &[WorkerSpec]) {
        self.header("Research Team");
        for (i, spec) in roster.iter().enumerate() {
            if self.colored {
                println!(
                    "\n  {} {}",
                    format!("{}.", i + 1).dimmed(),
                    spec.name.cyan().bold()
                );
            } else {
                println!("\n  {}. {}", i + 1, spec.name);
            }
            self.kv("role", &spec.role);
            self.kv("capability", spec.capability.as_str());
            self.kv("min findings", &spec.schema.min_findings.to_string());
            self.kv("table", &spec.schema.table_columns.join(" | "));
        }
        println!();
    }

    /// Print a finished report followed by its metadata
    pub fn report(&self, report: &Report) {
        println!("\n{}\n", report.text.trim());

        self.header("Run Summary");
        self.kv("contributors", &report.contributors.join(", "));
        self.kv("tables", &report.table_count.to_string());
        self.kv("links", &report.links.len().to_string());
        for gap in &report.gaps {
            self.warning(&format!("{} contributed nothing: {}", gap.worker, gap.reason));
        }
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}
