// ==========================================
// 每周派车分配系统 - 命令行入口
// ==========================================
// 子命令:
//   run           整周分配并写出全部结果
//   check-roster  只导入花名册,报告数据质量问题
// 日志写 stderr,运行报告写 stdout
// ==========================================

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use weekly_dispatch::config::{config_keys, ConfigManager};
use weekly_dispatch::domain::types::Weekday;
use weekly_dispatch::domain::DriverKey;
use weekly_dispatch::engine::WeekOrchestrator;
use weekly_dispatch::export::{render_text_report, ExportWriter, RunSummary, WeekCalendar};
use weekly_dispatch::importer::{load_day_targets, load_name_list, RosterImport, RosterImporter};
use weekly_dispatch::logging::{self, LogFormat};

/// 每周派车分配: 认证线路 / 帮手线路 / 帮手 / XL / 待命
#[derive(Debug, Parser)]
#[command(name = "weekly-dispatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 配置文件路径（默认: <config_dir>/weekly-dispatch/config.json）
    #[arg(long, global = true, env = "WEEKLY_DISPATCH_CONFIG")]
    config: Option<PathBuf>,

    /// 以 JSON 格式输出日志
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// 整周分配并写出日汇总表、周网格与审计文件
    Run(RunArgs),

    /// 导入花名册并报告数据质量问题
    CheckRoster(RosterArgs),
}

#[derive(Debug, Args)]
struct RosterArgs {
    /// 花名册文件（.xlsx / .xls / .csv）
    roster: PathBuf,

    /// 新司机名单（每行一个姓名）
    #[arg(long)]
    new_list: Option<PathBuf>,

    /// 半限制司机名单（每行一个姓名）
    #[arg(long)]
    semi_list: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct RunArgs {
    #[command(flatten)]
    roster: RosterArgs,

    /// 日目标文件（CSV: day,dot_helper_route,dot_helper,dot,xl）
    #[arg(long)]
    targets: PathBuf,

    /// ISO 周号（默认: 本周）
    #[arg(long)]
    week: Option<u32>,

    /// ISO 周所属年份（默认: 今年）
    #[arg(long, requires = "week")]
    year: Option<i32>,

    /// 输出目录
    #[arg(long, default_value = "dispatch_out")]
    out_dir: PathBuf,

    /// 随机种子（覆盖配置中的 rng_seed）
    #[arg(long, env = "WEEKLY_DISPATCH_SEED")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    });

    if let Err(e) = cli.run() {
        eprintln!("错误: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

impl Cli {
    fn run(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => ConfigManager::load(path)
                .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
            None => ConfigManager::load_default().context("无法加载默认配置")?,
        };

        match self.command {
            Commands::Run(args) => run_week(config, args),
            Commands::CheckRoster(args) => check_roster(&config, &args),
        }
    }
}

// ==========================================
// run: 整周分配
// ==========================================
fn run_week(mut config: ConfigManager, args: RunArgs) -> Result<()> {
    if let Some(seed) = args.seed {
        config.set(config_keys::RNG_SEED, seed.to_string());
    }
    tracing::info!(
        version = weekly_dispatch::VERSION,
        config_source = ?config.source(),
        config = %config.get_config_snapshot()?,
        "{} 启动",
        weekly_dispatch::APP_NAME
    );

    let import = import_roster(&config, &args.roster)?;
    let targets = load_day_targets(&args.targets)
        .with_context(|| format!("无法读取日目标文件 {}", args.targets.display()))?;

    let calendar = resolve_calendar(args.week, args.year)?;
    let policy = config.allocation_policy()?;
    let mut rng = match config.get_rng_seed()? {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let result = WeekOrchestrator::new(policy)
        .run(&import.roster, &targets.targets, &mut rng)
        .context("整周分配失败")?;

    let summary = RunSummary::build(&result, &calendar, config.effective_config());
    let written = ExportWriter::new(&args.out_dir)
        .and_then(|writer| writer.write_all(&result, &import.roster, &calendar, &summary))
        .with_context(|| format!("无法写出结果到 {}", args.out_dir.display()))?;

    print!("{}", render_text_report(&result, &import.roster, &calendar));
    println!();
    println!("已写出 {} 个文件到 {}", written.len(), args.out_dir.display());
    Ok(())
}

// ==========================================
// check-roster: 花名册检查
// ==========================================
fn check_roster(config: &ConfigManager, args: &RosterArgs) -> Result<()> {
    let import = import_roster(config, args)?;
    let report = &import.report;

    println!("花名册: {}", args.roster.display());
    println!(
        "  司机 {} 名 (认证 {}, 新司机 {}, 半限制 {})",
        report.drivers, report.certified, report.new_drivers, report.semi_restricted
    );
    for day in Weekday::ALL {
        println!(
            "  {}: 可出勤 {} 名",
            day,
            import.roster.pool_for(day).len()
        );
    }

    if report.issues.is_empty() {
        println!("未发现数据质量问题");
    } else {
        println!("数据质量问题 {} 条:", report.issues.len());
        for issue in &report.issues {
            println!(
                "  第 {} 行 {} {}: {:?} ({})",
                issue.row_number, issue.driver, issue.day, issue.raw_value, issue.message
            );
        }
    }
    Ok(())
}

fn import_roster(config: &ConfigManager, args: &RosterArgs) -> Result<RosterImport> {
    let new_drivers = load_optional_list(args.new_list.as_deref())?;
    let semi_restricted = load_optional_list(args.semi_list.as_deref())?;

    let importer = RosterImporter::from_config(config).context("花名册布局配置无效")?;
    importer
        .import_file(&args.roster, &new_drivers, &semi_restricted)
        .with_context(|| format!("无法导入花名册 {}", args.roster.display()))
}

fn load_optional_list(path: Option<&Path>) -> Result<Vec<DriverKey>> {
    match path {
        Some(path) => load_name_list(path)
            .with_context(|| format!("无法读取名单 {}", path.display())),
        None => Ok(Vec::new()),
    }
}

fn resolve_calendar(week: Option<u32>, year: Option<i32>) -> Result<WeekCalendar> {
    let today = Local::now().date_naive();
    match week {
        Some(week) => {
            let year = year.unwrap_or_else(|| today.iso_week().year());
            Ok(WeekCalendar::for_iso_week(year, week)?)
        }
        None => Ok(WeekCalendar::containing(today)),
    }
}
