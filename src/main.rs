use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use road_router::{
    CoordinateFields, FileStore, KeyValueStore, MapScene, MapView, MemoryStore, NodeForm,
    Position, RoadForm, RoadKey, Session, WeightForm,
};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

/// Edit a road network and find shortest routes between intersections
#[derive(Parser, Debug)]
#[command(name = "road-router")]
#[command(about = "Edit a road network and find shortest routes", long_about = None)]
struct Args {
    /// Directory the network is stored in
    #[arg(short, long, env = "ROAD_ROUTER_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Keep the network in memory only; nothing is read or written to disk
    #[arg(long)]
    memory: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List intersections and roads
    List,
    /// Add an intersection
    AddNode {
        id: String,
        #[arg(allow_hyphen_values = true)]
        latitude: String,
        #[arg(allow_hyphen_values = true)]
        longitude: String,
    },
    /// Add a road between two intersections
    AddRoad {
        from: String,
        to: String,
        #[arg(allow_hyphen_values = true)]
        weight: String,
    },
    /// Change the weight of a road
    SetWeight {
        from: String,
        to: String,
        #[arg(allow_hyphen_values = true)]
        weight: String,
    },
    /// Delete an intersection and every road touching it
    RemoveNode { id: String },
    /// Close a road
    RemoveRoad { from: String, to: String },
    /// Compute the shortest route between two intersections
    Route { start: String, end: String },
    /// Print the map scene as JSON, optionally with a route highlighted
    Render {
        #[arg(long, requires = "to")]
        from: Option<String>,
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
    /// Turn a map click into latitude/longitude field values
    Click {
        #[arg(allow_hyphen_values = true)]
        latitude: f64,
        #[arg(allow_hyphen_values = true)]
        longitude: f64,
    },
    /// Forget all edits and restore the default intersections
    Reset,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if args.memory {
        run(Session::open(MemoryStore::new())?, args.command)
    } else {
        debug!("Data directory: {:?}", args.data_dir);
        let store = FileStore::open(&args.data_dir)
            .with_context(|| format!("cannot open data directory {:?}", args.data_dir))?;
        run(Session::open(store)?, args.command)
    }
}

fn run<S: KeyValueStore>(mut session: Session<S>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List => {
            let network = session.network();
            println!("Intersections:");
            for node in network.nodes() {
                println!(
                    "  {:<6} {:<20} {:.5}, {:.5}",
                    node.id, node.name, node.position.latitude, node.position.longitude
                );
            }
            println!("Roads:");
            for edge in network.edges() {
                println!("  {:<12} {}", RoadKey::of(edge).to_string(), edge.weight);
            }
        }
        Command::AddNode {
            id,
            latitude,
            longitude,
        } => {
            session.submit_node(&NodeForm {
                id: id.clone(),
                latitude,
                longitude,
            })?;
            println!("Added intersection {id}");
        }
        Command::AddRoad { from, to, weight } => {
            session.submit_road(&RoadForm {
                from: from.clone(),
                to: to.clone(),
                weight,
            })?;
            println!("Added road {from}-{to}");
        }
        Command::SetWeight { from, to, weight } => {
            let road = RoadKey::new(from, to);
            let updated = session.submit_weight(&WeightForm {
                road: Some(road.clone()),
                weight,
            })?;
            println!("Updated {updated} road(s) {road}");
        }
        Command::RemoveNode { id } => match session.remove_node(&id)? {
            Some(node) => println!("Deleted {}", node.name),
            None => println!("No intersection {id}"),
        },
        Command::RemoveRoad { from, to } => {
            let road = RoadKey::new(from, to);
            let removed = session.remove_edge(&road)?;
            println!("Closed {removed} road(s) {road}");
        }
        Command::Route { start, end } => match session.route(&start, &end)? {
            Some(route) => println!("{} (distance {})", route.path.join(" -> "), route.distance),
            None => println!("No path found from {start} to {end}."),
        },
        Command::Render { from, to } => {
            let route = match (from, to) {
                (Some(from), Some(to)) => session.route(&from, &to)?,
                _ => None,
            };
            let scene = MapScene::build(MapView::default(), session.network(), route.as_ref());
            println!("{}", serde_json::to_string_pretty(&scene)?);
        }
        Command::Click {
            latitude,
            longitude,
        } => {
            let fields = CoordinateFields::from_click(Position::new(latitude, longitude));
            println!("{}", serde_json::to_string(&fields)?);
        }
        Command::Reset => {
            session.reset()?;
            println!("Restored {} default intersections", session.network().nodes().len());
        }
    }

    Ok(())
}
