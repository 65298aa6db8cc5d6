//! Command-line help with log format reference and usage examples

use crate::plot::fonts::FONT_CANDIDATES;
use colored::*;

/// Topics accepted by `--help-topic`
pub const HELP_TOPICS: &[&str] = &["patterns", "output", "examples"];

/// Help system for the CLI application
pub struct HelpSystem {
    version: &'static str,
}

impl HelpSystem {
    /// Create a new help system
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Display the main help message with all available options
    pub fn display_main_help(&self, use_colors: bool) -> String {
        let mut help = String::new();

        help.push_str(&self.format_header(use_colors));
        help.push('\n');
        help.push_str(&self.format_usage_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_options_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_examples_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_footer(use_colors));

        help
    }

    /// Display help for one topic, `None` if the topic is unknown
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.to_lowercase().as_str() {
            "patterns" | "pattern" | "format" => Some(self.format_patterns_help(use_colors)),
            "output" | "plot" => Some(self.format_output_help(use_colors)),
            "examples" => Some(self.format_examples_section(use_colors)),
            _ => None,
        }
    }

    fn section_header(title: &str, use_colors: bool) -> String {
        if use_colors {
            title.bright_green().bold().to_string()
        } else {
            title.to_string()
        }
    }

    fn format_header(&self, use_colors: bool) -> String {
        let title = "latplot";
        let subtitle = "Plot the latency CDF of a benchmark log";

        if use_colors {
            format!(
                "{}\n{}\nVersion: {}\n",
                title.bright_cyan().bold(),
                subtitle.bright_blue(),
                self.version.green()
            )
        } else {
            format!("{}\n{}\nVersion: {}\n", title, subtitle, self.version)
        }
    }

    fn format_usage_section(&self, use_colors: bool) -> String {
        let usage_patterns = [
            "latplot <INPUT> [OPTIONS]",
            "latplot <INPUT> --summary --format json",
            "latplot --help-topic <TOPIC>",
        ];

        let mut usage = format!("{}\n", Self::section_header("USAGE:", use_colors));
        for pattern in usage_patterns {
            if use_colors {
                usage.push_str(&format!("  {}\n", pattern.bright_white()));
            } else {
                usage.push_str(&format!("  {}\n", pattern));
            }
        }

        usage
    }

    fn format_options_section(&self, use_colors: bool) -> String {
        let options = [
            OptionHelp {
                short: Some("o"),
                long: "output",
                value: "<PATH>",
                description: "Image path (default: <INPUT>.png)",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "width",
                value: "<PX>",
                description: "Image width in pixels (100-10000, default 1000)",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "height",
                value: "<PX>",
                description: "Image height in pixels (100-10000, default 600)",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "title",
                value: "<TEXT>",
                description: "Chart caption",
                example: Some("--title \"GetDetail latency\""),
            },
            OptionHelp {
                short: None,
                long: "font",
                value: "<PATH>",
                description: "TrueType/OpenType font for caption and labels",
                example: Some("--font /usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
            },
            OptionHelp {
                short: Some("s"),
                long: "summary",
                value: "",
                description: "Print count, min, max, mean and percentiles to stdout",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "format",
                value: "<text|json>",
                description: "Summary format",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "no-color",
                value: "",
                description: "Disable colored output",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "verbose",
                value: "",
                description: "Log extraction counts and phase timings",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "debug",
                value: "",
                description: "Log everything as JSON with source locations",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "help-topic",
                value: "<TOPIC>",
                description: "Show help for: patterns, output, examples",
                example: None,
            },
        ];

        let mut output = format!("{}\n", Self::section_header("OPTIONS:", use_colors));
        for option in options {
            output.push_str(&option.format(use_colors));
            output.push('\n');
        }

        output
    }

    fn format_examples_section(&self, use_colors: bool) -> String {
        let examples = [
            ExampleHelp {
                title: "Plot a benchmark log",
                command: "latplot results/bench.log",
                description: "Writes results/bench.log.png",
            },
            ExampleHelp {
                title: "Choose the image path and size",
                command: "latplot bench.log --output cdf.png --width 1600 --height 900",
                description: "Renders a larger chart to cdf.png",
            },
            ExampleHelp {
                title: "Machine-readable summary",
                command: "latplot bench.log --summary --format json",
                description: "Prints count, min, max, mean and percentiles as JSON on stdout",
            },
            ExampleHelp {
                title: "Troubleshoot a log that yields no data",
                command: "latplot bench.log --verbose --no-color",
                description: "Shows how many lines were read and how many matched",
            },
        ];

        let mut output = format!("{}\n", Self::section_header("EXAMPLES:", use_colors));
        for example in examples {
            output.push_str(&example.format(use_colors));
            output.push('\n');
        }

        output
    }

    fn format_footer(&self, use_colors: bool) -> String {
        let footer = format!(
            "More help: latplot --help-topic <{}>",
            HELP_TOPICS.join("|")
        );
        if use_colors {
            format!("{}\n", footer.bright_blue())
        } else {
            format!("{}\n", footer)
        }
    }

    fn format_patterns_help(&self, use_colors: bool) -> String {
        let mut help = format!(
            "{}\n\n",
            Self::section_header("LOG LINE PATTERNS:", use_colors)
        );

        help.push_str("Each line is checked against these patterns, in order:\n\n");
        help.push_str("1. took <N> us\n");
        help.push_str("   'took', whitespace, decimal digits, whitespace, 'us'\n");
        help.push_str("   Example: GetDetail took 1532 us\n\n");
        help.push_str("2. ;<N> at the end of the line\n");
        help.push_str("   a semicolon followed by decimal digits up to the line end\n");
        help.push_str("   Example: PostReview;user42;restaurant7;1532\n\n");

        help.push_str("N is in microseconds and is plotted as N / 1000 milliseconds.\n");
        help.push_str("Lines matching neither pattern are skipped. If no line matches,\n");
        help.push_str("latplot exits with code 6 and writes no image.\n");

        help
    }

    fn format_output_help(&self, use_colors: bool) -> String {
        let mut help = format!(
            "{}\n\n",
            Self::section_header("OUTPUT REFERENCE:", use_colors)
        );

        help.push_str("PLOT:\n");
        help.push_str("- PNG written to <INPUT>.png unless --output is given\n");
        help.push_str("- X axis: latency in ms, from 0 to just past the largest value\n");
        help.push_str("- Y axis: fraction of requests at or below that latency (0 to 1)\n\n");

        help.push_str("FONTS:\n");
        help.push_str("Caption and axis labels need a TrueType/OpenType font. Without --font\n");
        help.push_str("these locations are tried:\n");
        for candidate in FONT_CANDIDATES {
            help.push_str(&format!("  {}\n", candidate));
        }
        help.push_str("If none is usable the chart is drawn without text.\n\n");

        help.push_str("STREAMS:\n");
        help.push_str("- stdout: the --summary output only\n");
        help.push_str("- stderr: warnings, logs and errors\n\n");

        help.push_str("EXIT CODES:\n");
        help.push_str("  0  success\n");
        help.push_str("  1  invalid arguments\n");
        help.push_str("  5  input or output file error\n");
        help.push_str("  6  no latency lines found\n");
        help.push_str("  7  rendering failed\n");

        help
    }
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for formatting individual options
struct OptionHelp {
    short: Option<&'static str>,
    long: &'static str,
    value: &'static str,
    description: &'static str,
    example: Option<&'static str>,
}

impl OptionHelp {
    fn format(&self, use_colors: bool) -> String {
        let mut option_str = String::new();

        if let Some(short) = self.short {
            if use_colors {
                option_str.push_str(&format!("  {}, ", format!("-{}", short).bright_cyan()));
            } else {
                option_str.push_str(&format!("  -{}, ", short));
            }
        } else {
            option_str.push_str("      ");
        }

        let long_with_value = if self.value.is_empty() {
            format!("--{}", self.long)
        } else {
            format!("--{} {}", self.long, self.value)
        };

        if use_colors {
            option_str.push_str(&format!("{:<30} {}",
                long_with_value.bright_cyan(),
                self.description.white()
            ));
        } else {
            option_str.push_str(&format!("{:<30} {}", long_with_value, self.description));
        }

        if let Some(example) = self.example {
            if use_colors {
                option_str.push_str(&format!("\n{}{}", " ".repeat(36),
                    format!("Example: {}", example).bright_blue().italic()
                ));
            } else {
                option_str.push_str(&format!("\n{}Example: {}", " ".repeat(36), example));
            }
        }

        option_str
    }
}

/// Helper struct for formatting examples
struct ExampleHelp {
    title: &'static str,
    command: &'static str,
    description: &'static str,
}

impl ExampleHelp {
    fn format(&self, use_colors: bool) -> String {
        if use_colors {
            format!("  {}:\n    {}\n    {}\n",
                self.title.bright_yellow().bold(),
                self.command.bright_white(),
                self.description.bright_blue().italic()
            )
        } else {
            format!("  {}:\n    {}\n    {}\n",
                self.title, self.command, self.description
            )
        }
    }
}
