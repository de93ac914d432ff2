use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use course_core::model::SectionSlug;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::exam_service::{DEFAULT_EXAM_SIZE, DEFAULT_PASS_MARK};
use services::{Clock, CourseCatalog, ExamService};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSection { raw: String },
    InvalidExamSize { raw: String },
    InvalidPassMark { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSection { raw } => write!(f, "invalid --section value: {raw}"),
            ArgsError::InvalidExamSize { raw } => write!(f, "invalid --exam-size value: {raw}"),
            ArgsError::InvalidPassMark { raw } => {
                write!(f, "invalid --pass-mark value: {raw} (expected 0-100)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    catalog: Arc<CourseCatalog>,
    exam_service: Arc<ExamService>,
    initial_section: Option<SectionSlug>,
}

impl UiApp for DesktopApp {
    fn catalog(&self) -> Arc<CourseCatalog> {
        Arc::clone(&self.catalog)
    }

    fn exam_service(&self) -> Arc<ExamService> {
        Arc::clone(&self.exam_service)
    }

    fn initial_section(&self) -> Option<SectionSlug> {
        self.initial_section.clone()
    }
}

#[derive(Debug)]
struct Args {
    content: PathBuf,
    section: Option<SectionSlug>,
    exam_size: usize,
    pass_mark: u8,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui    [--content <path>] [--section <slug>]");
    eprintln!("                            [--exam-size <n>] [--pass-mark <percent>]");
    eprintln!("  cargo run -p app -- check [--content <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --content content");
    eprintln!("  --exam-size {DEFAULT_EXAM_SIZE}");
    eprintln!("  --pass-mark {DEFAULT_PASS_MARK}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  COURSE_CONTENT_DIR, COURSE_SECTION, COURSE_EXAM_SIZE, COURSE_PASS_MARK, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Check,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

fn parse_section(raw: String) -> Result<SectionSlug, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidSection { raw })
}

fn parse_exam_size(raw: String) -> Result<usize, ArgsError> {
    match raw.parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ArgsError::InvalidExamSize { raw }),
    }
}

fn parse_pass_mark(raw: String) -> Result<u8, ArgsError> {
    match raw.parse::<u8>() {
        Ok(mark) if mark <= 100 => Ok(mark),
        _ => Err(ArgsError::InvalidPassMark { raw }),
    }
}

impl Args {
    fn from_env() -> Result<Self, ArgsError> {
        let env = |key: &str| std::env::var(key).ok().filter(|value| !value.trim().is_empty());
        Ok(Self {
            content: env("COURSE_CONTENT_DIR").map_or_else(|| PathBuf::from("content"), PathBuf::from),
            section: env("COURSE_SECTION").map(parse_section).transpose()?,
            exam_size: env("COURSE_EXAM_SIZE")
                .map(parse_exam_size)
                .transpose()?
                .unwrap_or(DEFAULT_EXAM_SIZE),
            pass_mark: env("COURSE_PASS_MARK")
                .map(parse_pass_mark)
                .transpose()?
                .unwrap_or(DEFAULT_PASS_MARK),
        })
    }

    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::from_env()?;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--content" => parsed.content = PathBuf::from(require_value(args, "--content")?),
                "--section" => {
                    parsed.section = Some(parse_section(require_value(args, "--section")?)?);
                }
                "--exam-size" => {
                    parsed.exam_size = parse_exam_size(require_value(args, "--exam-size")?)?;
                }
                "--pass-mark" => {
                    parsed.pass_mark = parse_pass_mark(require_value(args, "--pass-mark")?)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

/// Print a content report. Returns `true` when no authoring errors were found.
fn check_content(catalog: &CourseCatalog) -> bool {
    println!("Sections: {}", catalog.sections().count());
    for section in catalog.sections() {
        println!(
            "  {} ({} inline check(s), quiz: {})",
            section.slug(),
            section.checks().count(),
            match section.quiz() {
                Some(quiz) if quiz.is_broken() => "broken",
                Some(_) => "yes",
                None => "no",
            }
        );
    }

    println!("Exam banks: {}", catalog.exam_banks().count());
    for exam in catalog.exam_banks() {
        let report = exam.report();
        println!("  {} \"{}\": {} question(s)", exam.slug(), exam.title(), report.total);
        for (difficulty, count) in &report.by_difficulty {
            println!("    {difficulty}: {count}");
        }
        for (section, count) in &report.by_section {
            println!("    section {section}: {count}");
        }
        for issue in &report.issues {
            println!("    advisory: {issue}");
        }
    }

    let problems = catalog.problems();
    for problem in &problems {
        println!("error: {}: {}", problem.slug, problem.problem);
    }
    for failure in catalog.failures() {
        println!("error: {failure}");
    }

    let clean = catalog.is_clean();
    if clean {
        println!("No authoring errors.");
    } else {
        println!(
            "{} authoring error(s), {} unreadable file(s).",
            problems.len(),
            catalog.failures().len()
        );
    }
    clean
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    log::debug!("{parsed:?}");

    let catalog = CourseCatalog::load(&parsed.content)?;

    match cmd {
        Command::Check => {
            if !check_content(&catalog) {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Ui => {
            if catalog.is_empty() {
                log::warn!("no course content found under {}", parsed.content.display());
            }
            if let Some(slug) = &parsed.section {
                if catalog.section(slug).is_none() {
                    log::warn!("section {slug} is not in the catalog");
                }
            }

            let exam_service = ExamService::new(Clock::default(), parsed.exam_size, parsed.pass_mark)?;
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                catalog: Arc::new(catalog),
                exam_service: Arc::new(exam_service),
                initial_section: parsed.section,
            });

            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Course")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
