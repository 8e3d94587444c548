use std::env;
use std::path::{Path, PathBuf};

use thumbscope::analysis::engagement::VideoStats;
use thumbscope::config::Settings;
use thumbscope::error::AnalysisError;
use thumbscope::pipeline::{AnalysisPipeline, ThumbnailReport};
use thumbscope::{AnalysisStatus, ThirdsOverlay};
use tracing::{info, Level};

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

struct CliArgs {
    images: Vec<PathBuf>,
    stats: Option<PathBuf>,
}

fn parse_args() -> Result<CliArgs, AnalysisError> {
    let mut images = Vec::new();
    let mut stats = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--stats" => {
                let path = args.next().ok_or_else(|| {
                    AnalysisError::Config("--stats requires a file path".to_string())
                })?;
                stats = Some(PathBuf::from(path));
            }
            _ => images.push(PathBuf::from(arg)),
        }
    }

    if images.is_empty() {
        return Err(AnalysisError::Config(
            "usage: thumbscope <image>... [--stats stats.json]".to_string(),
        ));
    }

    Ok(CliArgs { images, stats })
}

fn read_stats(path: &Path) -> Result<VideoStats, AnalysisError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[tokio::main]
async fn main() -> Result<(), AnalysisError> {
    init_logging();

    let args = parse_args()?;
    let settings = Settings::load("thumbscope")?;
    let stats = args.stats.as_deref().map(read_stats).transpose()?;

    let mut pipeline = AnalysisPipeline::builder()
        .with_options(settings.options.clone())
        .with_settings(settings.analysis.clone())
        .build()?;

    info!(
        images = args.images.len(),
        stages = ?pipeline.stage_names(),
        "starting analysis"
    );

    let mut overlay = ThirdsOverlay::new();

    for path in &args.images {
        let image = image::open(path)?;
        overlay.accumulate(&image);

        let mut report = ThumbnailReport::new(image);
        if let Some(stats) = stats.clone() {
            report = report.with_stats(stats);
        }

        let report = pipeline.process(report).await?;
        print_report(path, &report);
    }

    print_overlay(&overlay);
    Ok(())
}

fn print_report(path: &Path, report: &ThumbnailReport) {
    let (width, height) = report.dimensions();
    println!("\n=== {} ({width}x{height}) ===", path.display());

    if let Some(colors) = &report.colors {
        println!("dominant colors:");
        if colors.value.is_empty() {
            println!("  (no palette extracted)");
        }
        for cluster in &colors.value {
            let [r, g, b] = cluster.rgb;
            println!(
                "  rgb({r:>3}, {g:>3}, {b:>3})  {:>5.1}%",
                cluster.fraction * 100.0
            );
        }
        note_degraded(&colors.status);
    }

    if let Some(composition) = &report.composition {
        let m = &composition.value;
        println!("composition:");
        println!("  brightness      {:.3}", m.overall_brightness);
        println!("  contrast        {:.3}", m.contrast);
        println!("  edge density    {:.3}", m.edge_density);
        println!(
            "  h/v balance     {:.3} / {:.3}",
            m.balance_horizontal, m.balance_vertical
        );
        println!("  thirds          {:.3}", m.thirds_intensity);
        note_degraded(&composition.status);
    }

    if let Some(insights) = &report.insights {
        println!("insights:");
        for message in insights.messages() {
            println!("  - {message}");
        }
    }

    if let Some(text) = &report.text {
        if text.value.is_empty() {
            println!("text: none detected");
        } else {
            println!("text: \"{}\"", text.value.full_text);
            for (t, c) in text.value.texts.iter().zip(&text.value.confidences) {
                println!("  {t:<20} {c:>5.1}%");
            }
        }
        note_degraded(&text.status);
    }

    if let Some(faces) = &report.faces {
        println!("faces: {}", faces.value.count());
        note_degraded(&faces.status);
    }

    if let Some(e) = &report.engagement {
        println!("engagement:");
        println!(
            "  like ratio      {:.2}% ({})",
            e.like_ratio, e.performance.like_ratio
        );
        println!(
            "  comment ratio   {:.2}% ({})",
            e.comment_ratio, e.performance.comment_ratio
        );
        println!("  sub conversion  {:.2}%", e.sub_conversion);
        println!("  view velocity   {:.1} views/day", e.view_velocity);
        println!("  score           {:.1}/100", e.engagement_score);
    }
}

fn note_degraded(status: &AnalysisStatus) {
    if let AnalysisStatus::Degraded { reason } = status {
        println!("  (degraded: {reason})");
    }
}

fn print_overlay(overlay: &ThirdsOverlay) {
    let Some(means) = overlay.cell_means() else {
        return;
    };

    println!(
        "\n=== thirds-grid brightness over {} image(s) ===",
        overlay.image_count()
    );
    for row in means {
        println!("  {:.3}  {:.3}  {:.3}", row[0], row[1], row[2]);
    }
    if let Some((row, col)) = overlay.brightest_cell() {
        println!("brightest cell: row {row}, col {col}");
    }
}
