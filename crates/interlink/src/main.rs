//! Inspect and wire dashboard widget interactions from the command line.

use clap::Parser;
use config::Config;
use dashboard::Dashboard;
use interlink_core::{
    Builder, Configuration, Constraints, TreeNode,
    ca::tree_addr,
    effect,
    kind::{DataType, EventType, TargetType},
    path::ParseNodePathError,
    plug::{self, Signal},
    query::{detach_single_child_collections, filter_tree_with_target, find_node_by_path},
    route::{InteractionEvent, Router},
};
use serde::Serialize;
use std::path::PathBuf;

mod config;
mod dashboard;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to a RON config file. Defaults to `interlink.ron` if present.
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Print the interaction tree of a dashboard.
    Tree {
        dashboard: PathBuf,
        /// Only keep branches leading to nodes exposing this target type.
        #[clap(long)]
        target: Option<String>,
        /// Collapse collections with a single collection child.
        #[clap(long)]
        detach: bool,
    },
    /// Print the path and title of every node of a dashboard's tree.
    Paths { dashboard: PathBuf },
    /// Print the targets worth offering while editing a widget.
    Targets {
        widget_type: String,
        /// Constrain the targets to the layer with this name.
        #[clap(long)]
        layer: Option<String>,
    },
    /// Print whether a node can be plugged to a signal.
    Status {
        dashboard: PathBuf,
        #[clap(long)]
        target_path: String,
        #[clap(long)]
        data_type: String,
        /// The layer name the signal is constrained to.
        #[clap(long)]
        layer: Option<String>,
        #[clap(long)]
        force_plug: bool,
    },
    /// Print the target operations for an event emitted by a node.
    Route {
        dashboard: PathBuf,
        #[clap(long)]
        source: String,
        #[clap(long)]
        event: String,
        /// The event data as JSON.
        #[clap(long)]
        data: Option<String>,
        /// Print the widgets updated by the operations instead.
        #[clap(long)]
        apply: bool,
    },
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid node path: {0}")]
    Path(#[from] ParseNodePathError),
    #[error("no node at `{0}`")]
    NoNode(String),
}

/// The signal described by the `status` command's flags.
struct CliSignal {
    data_type: DataType,
    constraints: Constraints,
}

impl CliSignal {
    /// A signal of the given data type, constrained to `layer` if given.
    fn new(data_type: String, layer: Option<&str>) -> Self {
        let constraints = layer
            .map(|name| Constraints::layer(Some(name)))
            .unwrap_or_default();
        CliSignal {
            data_type: DataType::new(data_type),
            constraints,
        }
    }
}

impl Signal for CliSignal {
    fn data_type(&self) -> Option<&DataType> {
        Some(&self.data_type)
    }
    fn constraints(&self) -> &Constraints {
        &self.constraints
    }
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let env = env_logger::Env::default().default_filter_or(config.log_level.as_str());
    env_logger::Builder::from_env(env).init();

    match args.cmd {
        Command::Tree {
            dashboard,
            target,
            detach,
        } => {
            let tree = stamped_tree(&config, &Dashboard::read(&dashboard)?);
            let tree = match target {
                None => Some(tree),
                Some(target) => filter_tree_with_target(&tree, TargetType::new(target)),
            };
            let tree = match tree {
                Some(tree) if detach => {
                    Some(detach_single_child_collections(&tree, &config.detach_exclude_ids()))
                }
                tree => tree,
            };
            if let Some(tree) = &tree {
                log::info!("tree {}", tree_addr(tree));
            }
            print_json(&config, &tree)?;
        }
        Command::Paths { dashboard } => {
            let tree = stamped_tree(&config, &Dashboard::read(&dashboard)?);
            tree.visit(&mut |n| {
                println!("{}\t{}", n.node_path().unwrap_or_default(), n.title);
            });
        }
        Command::Targets { widget_type, layer } => {
            let layer = layer.map(|name| interlink_core::Layer {
                name: Some(name),
                ..Default::default()
            });
            let targets = config
                .catalog()
                .possible_targets_editing_widget(&widget_type, layer.as_ref());
            print_json(&config, &targets)?;
        }
        Command::Status {
            dashboard,
            target_path,
            data_type,
            layer,
            force_plug,
        } => {
            // Reject malformed paths before searching the tree.
            let _: interlink_core::NodePath = target_path.parse()?;
            let tree = stamped_tree(&config, &Dashboard::read(&dashboard)?);
            let node = find_node_by_path(&tree, &target_path)
                .ok_or_else(|| Error::NoNode(target_path.clone()))?;
            let signal = CliSignal::new(data_type, layer.as_deref());
            let configuration = Configuration { force_plug };
            let status = plug::item_pluggable_status(node, &signal, &configuration);
            print_json(&config, &status)?;
        }
        Command::Route {
            dashboard,
            source,
            event,
            data,
            apply,
        } => {
            let dashboard = Dashboard::read(&dashboard)?;
            let data = match data {
                Some(data) => serde_json::from_str(&data)?,
                None => serde_json::Value::Null,
            };
            let widgets = dashboard.widgets();
            let router = Router::from_lists(widgets.iter().map(|w| &w.interactions));
            let event = InteractionEvent {
                event_type: EventType::new(event),
                source_node_path: source,
                data,
            };
            let ops = router.route(&event);
            if apply {
                let mut updated = widgets.clone();
                for op in &ops {
                    for widget in updated.iter_mut() {
                        if let Some(applied) = effect::apply_target_operation(widget, op) {
                            *widget = applied;
                        }
                    }
                }
                print_json(&config, &updated)?;
            } else {
                print_json(&config, &ops)?;
            }
        }
    }
    Ok(())
}

fn stamped_tree(config: &Config, dashboard: &Dashboard) -> TreeNode {
    Builder::new(config.catalog())
        .root_tree(&dashboard.widgets(), &dashboard.layers)
        .with_node_paths()
}

fn print_json(config: &Config, value: &impl Serialize) -> Result<(), Error> {
    let s = if config.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{s}");
    Ok(())
}
