use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use plotters::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

use connectoscope::{
    generators::{
        biophysical, erdos_renyi, powerlaw_cluster, symmetric_barabasi_albert, watts_strogatz,
        BiophysicalNet,
    },
    graph::Graph,
    hist::{self, HistSeries, Metric},
    render::{Camera, Scene},
    weights::WeightMatrix,
};

/// Analyse a brain-connectivity weight dataset against synthetic comparison graphs and write the
/// figures to disk.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory containing the weights.json dataset.
    #[arg(long, default_value = "friday-harbor/linear_model")]
    data_dir: PathBuf,

    /// Directory the figures are written to (created if missing).
    #[arg(long, default_value = "figures")]
    out_dir: PathBuf,

    /// Keep connections with a p-value below this cutoff.
    #[arg(long, default_value_t = 0.01)]
    p_threshold: f64,

    /// Keep connections with a weight above this cutoff.
    #[arg(long, default_value_t = 0.0)]
    w_threshold: f64,

    /// Seed for the random generators; seeded from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Draw the overlaid degree, clustering and betweenness histograms.
    #[arg(long)]
    hists: bool,

    /// Draw the log-log degree distribution.
    #[arg(long)]
    log_log: bool,

    /// Draw the 2x2 clustering-coefficient panel.
    #[arg(long)]
    panel: bool,

    /// Render the 3D scene of the top clustering-coefficient nodes.
    #[arg(long)]
    scene: bool,

    /// Export the 120-frame turntable sequence for the scene.
    #[arg(long)]
    turntable: bool,
}

impl Args {
    /// When no figure flag is given, everything but the turntable is produced.
    fn select_all(&self) -> bool {
        !(self.hists || self.log_log || self.panel || self.scene || self.turntable)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let all = args.select_all();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating output directory {}", args.out_dir.display()))?;

    let dataset = WeightMatrix::load(&args.data_dir)
        .with_context(|| format!("loading dataset from {}", args.data_dir.display()))?;
    let net = dataset.threshold(args.p_threshold, args.w_threshold);
    let mut brain = net.to_graph(false);

    let n = brain.vertex_count();
    info!(
        "thresholded brain graph: {} regions, {} connections",
        n,
        brain.edge_count()
    );

    // Comparison graphs, parameterised to match the brain graph's size and density.
    let mut er = erdos_renyi(n, 0.087, &mut rng);
    let mut ws = watts_strogatz(n, 36, 0.159, &mut rng);
    let mut sba = symmetric_barabasi_albert(n, 20, 0.52, &mut rng);
    let mut pwc = powerlaw_cluster(n, 19, 1.0, &mut rng);
    let mut bio = biophysical(426, 7804, 1.0, 1.5, &mut rng);
    info!(
        "generated comparison graphs: ER {}, WS {}, SBA {}, PWC {}, biophysical {}",
        er.edge_count(),
        ws.edge_count(),
        sba.edge_count(),
        pwc.edge_count(),
        bio.graph.edge_count()
    );

    if args.hists || args.log_log || all {
        let series = all_series(
            Metric::Degree,
            &mut brain,
            &mut er,
            &mut ws,
            &mut sba,
            &mut pwc,
            &mut bio.graph,
        );

        if args.hists || all {
            let path = args.out_dir.join("degree_hist.png");
            hist::overlay_histogram(
                &path,
                "Degree distribution",
                Metric::Degree.axis_label(),
                &hist::linspace(0.0, 150.0, 50),
                &series,
            )?;
            info!("wrote {}", path.display());
        }

        if args.log_log || all {
            let path = args.out_dir.join("degree_loglog.png");
            hist::log_log_degree(&path, &hist::linspace(0.0, 150.0, 20), &series)?;
            info!("wrote {}", path.display());
        }
    }

    if args.hists || args.panel || all {
        let series = all_series(
            Metric::Clustering,
            &mut brain,
            &mut er,
            &mut ws,
            &mut sba,
            &mut pwc,
            &mut bio.graph,
        );

        if args.hists || all {
            let path = args.out_dir.join("clustering_hist.png");
            hist::overlay_histogram(
                &path,
                "Clustering coefficient distribution",
                Metric::Clustering.axis_label(),
                &hist::linspace(0.0, 1.0, 50),
                &series,
            )?;
            info!("wrote {}", path.display());
        }

        if args.panel || all {
            let path = args.out_dir.join("clustering_panel.png");
            let panels = [
                relabel(&series[0], "Allen Mouse Brain Atlas (LM)"),
                relabel(&series[1], "Erdos_Renyi"),
                relabel(&series[3], "Symmetric Barabasi-Albert"),
                relabel(&series[2], "Watts-Strogatz graph"),
            ];
            hist::metric_panel(
                &path,
                Metric::Clustering.axis_label(),
                &hist::linspace(0.0, 1.0, 50),
                &panels,
            )?;
            info!("wrote {}", path.display());
        }
    }

    if args.hists || all {
        let series = all_series(
            Metric::Betweenness,
            &mut brain,
            &mut er,
            &mut ws,
            &mut sba,
            &mut pwc,
            &mut bio.graph,
        );

        let path = args.out_dir.join("betweenness_hist.png");
        hist::overlay_histogram(
            &path,
            "Node betweenness distribution",
            Metric::Betweenness.axis_label(),
            &hist::linspace(0.0, 0.02, 50),
            &series,
        )?;
        info!("wrote {}", path.display());
    }

    if args.scene || args.turntable || all {
        let scene = top_clustering_scene(&mut bio, 20)?;

        if args.scene || all {
            let path = args.out_dir.join("scene.png");
            let root = BitMapBackend::new(&path, (900, 700)).into_drawing_area();
            let stats = scene.render(&root, &Camera::default())?;
            root.present()
                .with_context(|| format!("writing {}", path.display()))?;
            info!(
                "wrote {} ({} markers, {} segments)",
                path.display(),
                stats.markers,
                stats.segments
            );
        }

        if args.turntable {
            let frames_dir = args.out_dir.join("frames");
            std::fs::create_dir_all(&frames_dir)
                .with_context(|| format!("creating frames directory {}", frames_dir.display()))?;

            let written = scene.export_turntable(&frames_dir)?;
            info!("wrote {} frames to {}", written.len(), frames_dir.display());
        }
    }

    Ok(())
}

/// Samples a metric over the brain graph and every comparison graph, with the fixed per-graph
/// colours used across all figures.
fn all_series(
    metric: Metric,
    brain: &mut Graph<&str>,
    er: &mut Graph<usize>,
    ws: &mut Graph<usize>,
    sba: &mut Graph<usize>,
    pwc: &mut Graph<usize>,
    bio: &mut Graph<usize>,
) -> Vec<HistSeries> {
    vec![
        HistSeries::from_graph("Allen Mouse Brain Atlas", BLACK, brain, metric),
        HistSeries::from_graph("Erdos-Renyi", BLUE, er, metric),
        HistSeries::from_graph("Watts-Strogatz", GREEN, ws, metric),
        HistSeries::from_graph("Symmetric Barabasi-Albert", RED, sba, metric),
        HistSeries::from_graph("Power-law cluster", CYAN, pwc, metric),
        HistSeries::from_graph("Biophysical", MAGENTA, bio, metric),
    ]
}

fn relabel(series: &HistSeries, label: &str) -> HistSeries {
    let mut series = series.clone();
    series.label = label.to_string();
    series
}

/// Builds the 3D scene of the `count` highest clustering-coefficient vertices of the
/// biophysical net, using the generator's unit-cube embedding for positions.
fn top_clustering_scene(net: &mut BiophysicalNet, count: usize) -> anyhow::Result<Scene> {
    let coefficients = net.graph.clustering_coefficients();

    let mut ranked: Vec<usize> = net.graph.vertices().into_iter().collect();
    ranked.sort_by(|a, b| {
        coefficients[b]
            .partial_cmp(&coefficients[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(b))
    });
    ranked.truncate(count);

    let chosen: std::collections::HashSet<usize> = ranked.iter().copied().collect();
    let node_names: Vec<String> = ranked.iter().map(|v| v.to_string()).collect();
    let node_positions = ranked.iter().map(|v| net.positions[*v]).collect();
    let node_label_set = vec![true; ranked.len()];

    let edges: Vec<(String, String)> = net
        .graph
        .edges()
        .into_iter()
        .filter(|(edge, _)| chosen.contains(edge.source()) && chosen.contains(edge.target()))
        .map(|(edge, _)| (edge.source().to_string(), edge.target().to_string()))
        .collect();
    let edge_label_set = vec![false; edges.len()];

    let scene = Scene::new(
        node_names,
        node_positions,
        node_label_set,
        edges,
        edge_label_set,
    )?;

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_selects_everything_but_the_turntable() {
        let args = Args::parse_from(["connectoscope"]);
        assert!(args.select_all());

        let args = Args::parse_from(["connectoscope", "--scene"]);
        assert!(!args.select_all());
        assert!(args.scene);
        assert!(!args.turntable);
    }

    #[test]
    fn default_thresholds_and_paths() {
        let args = Args::parse_from(["connectoscope"]);

        assert_eq!(args.p_threshold, 0.01);
        assert_eq!(args.w_threshold, 0.0);
        assert_eq!(args.data_dir, PathBuf::from("friday-harbor/linear_model"));
    }

    #[test]
    fn top_clustering_scene_keeps_the_requested_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut net = biophysical(30, 90, 1.0, 1.5, &mut rng);

        let scene = top_clustering_scene(&mut net, 10).unwrap();
        assert_eq!(scene.segments().len(), scene.edge_styles().len());
        assert_eq!(scene.node_styles().len(), 10);
    }
}
