use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use crate::model::parse_dims;
use crate::runtime::{AppContext, LoadEvent, Loader, Preferences};
use crate::view::ViewEvent;
use crate::workflow::{SpecToggles, ViewSpec, load_spec, rasterize_plan, save_report};

#[derive(Debug, Parser)]
#[command(
    name = "aview",
    version,
    about = "Slice, reduce and plot n-dimensional array files"
)]
struct Cli {
    /// Preferences file; a missing file falls back to the defaults.
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Loads files and prints every dataset with its shape and dtype.
    Info { inputs: Vec<PathBuf> },
    /// Slices one dataset and prints the resulting display plan.
    Show {
        #[arg(long)]
        input: PathBuf,
        /// Dataset path inside the file; the first dataset when omitted.
        #[arg(long, default_value = "")]
        data: String,
        /// Slice text for one dimension, repeatable in dimension order.
        #[arg(long = "slice")]
        slices: Vec<String>,
        /// Reduction over the `--dims` dimensions (nanmin, nanmax,
        /// nanmean, nanmedian).
        #[arg(long)]
        reduce: Option<String>,
        /// Dimensions the reduction covers, comma separated.
        #[arg(long)]
        dims: Option<String>,
        #[arg(long)]
        transpose: bool,
        /// Draw a 2-D cutout as one line per column.
        #[arg(long)]
        plot2d: bool,
        /// Treat 2 to 4 columns as scatter channels.
        #[arg(long)]
        scatter: bool,
        /// Draw a 3-channel rank-3 cutout as a color image.
        #[arg(long)]
        rgb: bool,
        /// Draw per-column minimum, mean and maximum.
        #[arg(long)]
        mmm: bool,
        /// Print the flattened values instead of plotting.
        #[arg(long)]
        flat: bool,
        /// Rasterize an image-like display to this PNG.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write the cutout to this .npy file.
        #[arg(long)]
        export_npy: Option<PathBuf>,
    },
    /// Executes a scripted view read from a YAML or JSON file.
    Run {
        #[arg(long)]
        spec: PathBuf,
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Steps an animation over one dimension, writing a PNG per frame.
    Animate {
        #[arg(long)]
        input: PathBuf,
        /// Dataset path inside the file; the first dataset when omitted.
        #[arg(long, default_value = "")]
        data: String,
        /// Dimension to animate.
        #[arg(long)]
        dim: usize,
        /// Frame count; the dimension size when omitted.
        #[arg(long)]
        frames: Option<usize>,
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Prints the effective preferences.
    Prefs {
        /// Also writes them to this file.
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
struct LeafInfo {
    path: String,
    shape: Vec<usize>,
    dtype: Option<String>,
    summary: String,
}

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    let prefs = Preferences::load_or_default(cli.prefs.as_deref());
    let mut app = AppContext::new(prefs);

    match cli.command {
        Commands::Info { inputs } => {
            let loader = Loader::new();
            for input in &inputs {
                loader.request(
                    input.clone(),
                    app.prefs().max_file_bytes(),
                    app.prefs().first_to_last,
                );
            }
            for _ in 0..inputs.len() {
                match loader.wait() {
                    Some(LoadEvent::Loaded(file)) => {
                        app.absorb(file);
                    }
                    Some(LoadEvent::Failed { path, message }) => {
                        return Err(format!("{}: {message}", path.display()));
                    }
                    None => break,
                }
            }
            let entries: Vec<LeafInfo> = app
                .store()
                .leaves()
                .into_iter()
                .map(|(path, value)| LeafInfo {
                    path: path.join("/"),
                    shape: value.shape().map(<[usize]>::to_vec).unwrap_or_default(),
                    dtype: value.dtype().map(|dtype| dtype.name().to_string()),
                    summary: value.summary(),
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&entries).map_err(|error| error.to_string())?
            );
        }
        Commands::Show {
            input,
            data,
            slices,
            reduce,
            dims,
            transpose,
            plot2d,
            scatter,
            rgb,
            mmm,
            flat,
            output,
            export_npy,
        } => {
            let reduce_dims = dims.as_deref().and_then(parse_dims).unwrap_or_default();
            let view = ViewSpec {
                input,
                dataset: data,
                slices,
                reduction: reduce,
                reduce_dims,
                toggles: SpecToggles {
                    plot_2d: plot2d,
                    scatter,
                    plot_3d: rgb,
                    min_mean_max: mmm,
                    print_flat: flat,
                    transpose,
                },
                export_png: output,
                export_npy,
            };
            let report = app.run_workflow(&view).map_err(|error| error.to_string())?;
            println!(
                "{}",
                serde_json::to_string_pretty(&report).map_err(|error| error.to_string())?
            );
        }
        Commands::Run { spec, report } => {
            let view = load_spec(&spec).map_err(|error| error.to_string())?;
            let view_report = app.run_workflow(&view).map_err(|error| error.to_string())?;
            if let Some(report_path) = report {
                save_report(report_path, &view_report).map_err(|error| error.to_string())?;
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&view_report).map_err(|error| error.to_string())?
            );
        }
        Commands::Animate {
            input,
            data,
            dim,
            frames,
            output_dir,
        } => {
            let key = app.open(&input).map_err(|error| error.to_string())?;
            let path = if data.is_empty() {
                app.store()
                    .first_leaf_path()
                    .ok_or_else(|| format!("no datasets in {}", input.display()))?
            } else {
                let mut path = vec![key];
                path.extend(data.split('/').map(str::to_string));
                path
            };
            let settings = app.prefs().plan_settings();
            let (mut session, value) = app.session(&path).map_err(|error| error.to_string())?;
            let size = session
                .shape
                .get(dim)
                .copied()
                .ok_or_else(|| format!("no dimension {dim} to animate"))?;
            let count = frames.unwrap_or(size);

            fs::create_dir_all(&output_dir).map_err(|error| error.to_string())?;
            let mut written = Vec::new();
            for frame in 0..count {
                let outcome = if frame == 0 {
                    session.handle(ViewEvent::AnimationToggled { dim }, value, &settings)
                } else {
                    session.handle(ViewEvent::AnimationTick, value, &settings)
                };
                let Some(output) = outcome.output else {
                    return Err(outcome.notices.join("; "));
                };
                let frame_path = output_dir.join(format!("frame-{frame:04}.png"));
                rasterize_plan(&output.plan, &frame_path).map_err(|error| error.to_string())?;
                written.push(frame_path);
            }
            let summary = json!({
                "input": input,
                "dataset": path.join("/"),
                "dim": dim,
                "frames": written,
                "interval_ms": app.prefs().anim_speed_ms,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).map_err(|error| error.to_string())?
            );
        }
        Commands::Prefs { write } => {
            if let Some(path) = write {
                app.prefs().save(&path).map_err(|error| error.to_string())?;
            }
            println!(
                "{}",
                serde_json::to_string_pretty(app.prefs()).map_err(|error| error.to_string())?
            );
        }
    }

    Ok(())
}
