use clap::{Arg, ArgMatches, Command};
use swingleg::export::{self, ExportFormat};
use swingleg::logging::{LogConfig, LogOutput, init_logging, level_from_verbosity, parse_log_level};
use swingleg::models::{ShapingMode, SwingTrajectory};
use swingleg::playback::TrajectoryPlayer;
use swingleg::scenario::ScenarioConfig;
use tracing::{error, info};

/// 表形式で表示する最大行数
const TABLE_ROWS: usize = 11;

fn main() {
    let matches = build_cli().get_matches();

    println!("遊脚軌道ジェネレータ (Swing Leg Trajectory) - swingleg v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let verbose_level = matches.get_count("verbose");

    let _log_guard = match init_logging(log_config(&matches, verbose_level)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("エラー: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&matches, verbose_level) {
        error!("{}", e);
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }
}

fn build_cli() -> Command {
    Command::new("swingleg")
        .version(env!("CARGO_PKG_VERSION"))
        .about("遊脚軌道ジェネレータ (Swing Leg Trajectory)")
        .long_about(
            "脚ロボット一歩分の遊脚軌道をガウス曲線で生成します。\n\
             x 軸は速度を積分、z 軸は位置を微分して位置・速度プロファイルを求めます。",
        )
        .arg(
            Arg::new("scenario")
                .short('s')
                .long("scenario")
                .value_name("FILE")
                .help("シナリオファイル(.yaml)のパスを指定")
                .long_help(
                    "境界条件と一歩の時間を記述したシナリオファイル(.yaml)を指定します。\n\
                     指定しない場合、組み込みのデモ設定で実行されます。",
                ),
        )
        .arg(
            Arg::new("points")
                .short('n')
                .long("points")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .help("サンプル数（シナリオの値を上書き、2以上）"),
        )
        .arg(
            Arg::new("shaping")
                .long("shaping")
                .value_name("MODE")
                .value_parser(["reference", "boundary"])
                .help("整形モード（シナリオの値を上書き）"),
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .action(clap::ArgAction::SetTrue)
                .help("シナリオの情報のみ表示して終了"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("軌道をファイルへ書き出し（.csv / .yaml）"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .value_parser(["csv", "yaml"])
                .requires("output")
                .help("出力形式（省略時は拡張子から判定）"),
        )
        .arg(
            Arg::new("playback")
                .short('p')
                .long("playback")
                .value_name("DT")
                .value_parser(clap::value_parser!(f64))
                .help("指定した制御周期（秒）で軌道を再生"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::Count)
                .help("詳細出力レベル (-v: 基本, -vv: 詳細, -vvv: デバッグ)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("ログレベル (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("log-output")
                .long("log-output")
                .value_name("TARGET")
                .default_value("console")
                .help("ログ出力先 (console, file, both)"),
        )
}

fn log_config(matches: &ArgMatches, verbose_level: u8) -> LogConfig {
    let level = match matches.get_one::<String>("log-level") {
        Some(level) => parse_log_level(level),
        None => level_from_verbosity(verbose_level),
    };

    let output = matches
        .get_one::<String>("log-output")
        .map(|s| {
            s.parse::<LogOutput>().unwrap_or_else(|e| {
                eprintln!("警告: {}", e);
                LogOutput::Console
            })
        })
        .unwrap_or(LogOutput::Console);

    LogConfig {
        level,
        output,
        ..LogConfig::default()
    }
}

/// シナリオを読み込んで軌道を生成・出力
fn run(matches: &ArgMatches, verbose_level: u8) -> Result<(), Box<dyn std::error::Error>> {
    let mut scenario = match matches.get_one::<String>("scenario") {
        Some(path) => {
            let scenario = ScenarioConfig::from_file(path)?;
            info!("シナリオファイル読み込み完了: {}", path);
            scenario
        }
        None => {
            println!("シナリオ未指定のため、デモ設定で実行します。");
            println!();
            ScenarioConfig::demo()
        }
    };

    if let Some(&num_points) = matches.get_one::<usize>("points") {
        scenario.sampling.num_points = num_points;
    }
    if let Some(mode) = matches.get_one::<String>("shaping") {
        scenario.shaping = mode.parse::<ShapingMode>()?;
    }
    scenario.validate()?;

    scenario.print_summary();
    println!();

    if matches.get_flag("info") {
        return Ok(());
    }

    let generator = scenario.build_generator()?;
    let trajectory = generator.generate(scenario.sampling.num_points)?;

    println!("{}", trajectory.summary());
    println!();

    if let Some(path) = matches.get_one::<String>("output") {
        let format = match matches.get_one::<String>("format") {
            Some(format) => format.parse::<ExportFormat>()?,
            None => ExportFormat::from_path(path),
        };
        export::save(&trajectory, path, format)?;
        println!("軌道を書き出しました: {} ({:?})", path, format);
    } else {
        print_table(&trajectory);
    }

    let playback_dt = matches
        .get_one::<f64>("playback")
        .copied()
        .or_else(|| scenario.playback.as_ref().map(|p| p.dt_s));

    if let Some(dt) = playback_dt {
        println!();
        let mut player = TrajectoryPlayer::new(trajectory, dt, verbose_level)?;
        let setpoints = player.run();
        println!("=== 再生結果 ===");
        println!("制御周期: {:.4}秒, 目標値数: {}", dt, setpoints.len());
        if let Some(last) = setpoints.last() {
            println!(
                "最終目標値: t={:.4} x={:.4} z={:.4} (vx={:.4}, vz={:.4})",
                last.time, last.x, last.z, last.x_velocity, last.z_velocity
            );
        }
    }

    Ok(())
}

/// 軌道を間引いて表形式で表示
fn print_table(trajectory: &SwingTrajectory) {
    let stride = (trajectory.len() / (TABLE_ROWS - 1)).max(1);

    println!("{:>6} {:>8} {:>10} {:>10} {:>10} {:>10}", "index", "t", "x", "vx", "z", "vz");
    let mut indices: Vec<usize> = (0..trajectory.len()).step_by(stride).collect();
    if indices.last() != Some(&(trajectory.len() - 1)) {
        indices.push(trajectory.len() - 1);
    }

    for i in indices {
        println!(
            "{:>6} {:>8.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            i,
            trajectory.t_values[i],
            trajectory.x_position[i],
            trajectory.x_velocity[i],
            trajectory.z_position[i],
            trajectory.z_velocity[i]
        );
    }
}
