use fence_engine::geom::Point2;
use fence_engine::layout::{
    Assembly, Boundary, BoundaryInterior, Drawing, DrawingParams, ElementKind, LayoutOptions,
    ModelExtents, PanelSpec, layout_boundary, layout_single_line,
};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

const SNAPSHOT_QUANTIZE: f64 = 1e-6;
const SNAPSHOT_DECIMALS: usize = 6;

const USAGE: &str = r#"layout_cli (fence-engine)

USAGE:
  layout_cli list
  layout_cli run <scenario|all> [options]

SCENARIOS:
  single_line_default
  single_line_three_250
  square_fixed_gap
  square_density
  oblique_corner
  drawn_square

OPTIONS (run):
  --json             Print the assembly as JSON instead of a snapshot
  --out <path>       Write the output to a file (single scenario only)
  --overwrite        Overwrite an existing output file
  -h, --help         Show this help
"#;

fn main() {
    if let Err(err) = run() {
        eprintln!("layout_cli error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = std::env::args().skip(1);

    let Some(command) = args.next() else {
        println!("{USAGE}");
        return Ok(());
    };

    match command.as_str() {
        "list" => {
            for scenario in Scenario::ALL {
                println!("{}", scenario.name());
            }
            Ok(())
        }
        "run" => cmd_run(args.collect()),
        "-h" | "--help" | "help" => {
            println!("{USAGE}");
            Ok(())
        }
        other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
    }
}

fn cmd_run(args: Vec<String>) -> Result<(), String> {
    let mut args = args.into_iter();
    let scenario_name = args.next().ok_or("missing scenario name")?;

    let mut json = false;
    let mut out: Option<PathBuf> = None;
    let mut overwrite = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--out" => out = Some(PathBuf::from(args.next().ok_or("missing value for --out")?)),
            "--overwrite" => overwrite = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
        }
    }

    let scenarios: Vec<Scenario> = if scenario_name == "all" {
        if out.is_some() {
            return Err("`run all` cannot write to a single --out file".to_string());
        }
        Scenario::ALL.to_vec()
    } else {
        vec![Scenario::from_str(&scenario_name).ok_or_else(|| {
            format!("unknown scenario `{scenario_name}` (try `layout_cli list`)")
        })?]
    };

    for scenario in scenarios {
        let assembly = scenario.run()?;
        let text = if json {
            serde_json::to_string_pretty(&assembly).map_err(|e| format!("serialize: {e}"))?
        } else {
            snapshot(scenario, &assembly)
        };

        match out.as_ref() {
            Some(path) => {
                if path.exists() && !overwrite {
                    return Err(format!(
                        "{} already exists (pass --overwrite)",
                        path.display()
                    ));
                }
                fs::write(path, text).map_err(|e| format!("write {}: {e}", path.display()))?;
            }
            None => println!("{text}"),
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Scenario {
    SingleLineDefault,
    SingleLineThree250,
    SquareFixedGap,
    SquareDensity,
    ObliqueCorner,
    DrawnSquare,
}

impl Scenario {
    const ALL: &'static [Self] = &[
        Self::SingleLineDefault,
        Self::SingleLineThree250,
        Self::SquareFixedGap,
        Self::SquareDensity,
        Self::ObliqueCorner,
        Self::DrawnSquare,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::SingleLineDefault => "single_line_default",
            Self::SingleLineThree250 => "single_line_three_250",
            Self::SquareFixedGap => "square_fixed_gap",
            Self::SquareDensity => "square_density",
            Self::ObliqueCorner => "oblique_corner",
            Self::DrawnSquare => "drawn_square",
        }
    }

    fn from_str(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }

    fn run(self) -> Result<Assembly, String> {
        let extents = ModelExtents::new().with(ElementKind::HorizontalBar, 1.0);
        let fixed_gap = LayoutOptions {
            interior: BoundaryInterior::FixedGap,
            ..LayoutOptions::default()
        };

        let result = match self {
            Self::SingleLineDefault => layout_single_line(&PanelSpec::default(), &extents),
            Self::SingleLineThree250 => {
                layout_single_line(&PanelSpec::new(250.0, 25.0, 3), &extents)
            }
            Self::SquareFixedGap => layout_boundary(
                &square(5.0),
                &PanelSpec::default(),
                &fixed_gap,
                &extents,
            ),
            Self::SquareDensity => layout_boundary(
                &square(5.0),
                &PanelSpec::new(250.0, 20.0, 1),
                &LayoutOptions::default(),
                &extents,
            ),
            Self::ObliqueCorner => layout_boundary(
                &Boundary::new(vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(4.0, 0.0),
                    Point2::new(7.0, 3.0),
                ]),
                &PanelSpec::default(),
                &LayoutOptions::default(),
                &extents,
            ),
            Self::DrawnSquare => {
                let boundary = draw(&[
                    (0.2, -0.1),
                    (5.1, 0.3),
                    (4.8, 5.2),
                    (-0.3, 4.9),
                    (0.1, 0.2),
                ])?;
                layout_boundary(
                    &boundary,
                    &PanelSpec::default(),
                    &LayoutOptions::default(),
                    &extents,
                )
            }
        };
        result.map_err(|e| e.to_string())
    }
}

fn square(side: f64) -> Boundary {
    Boundary::new(vec![
        Point2::new(0.0, 0.0),
        Point2::new(side, 0.0),
        Point2::new(side, side),
        Point2::new(0.0, side),
        Point2::new(0.0, 0.0),
    ])
}

fn draw(clicks: &[(f64, f64)]) -> Result<Boundary, String> {
    let params = DrawingParams::default();
    let mut drawing = Drawing::new();
    for &(x, z) in clicks {
        let step = drawing.push(Point2::new(x, z), &params);
        if let Some(boundary) = step.closed {
            return Ok(boundary);
        }
        drawing = step.drawing;
    }
    Err("clicks did not close the boundary".to_string())
}

fn quantize_f64(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
    if q == 0.0 { 0.0 } else { q }
}

fn snapshot(scenario: Scenario, assembly: &Assembly) -> String {
    let mut out = String::new();
    let diag = &assembly.diagnostics;
    let _ = writeln!(out, "scenario {}", scenario.name());
    let _ = writeln!(out, "diag.segment_count {}", diag.segment_count);
    let _ = writeln!(out, "diag.degenerate_segment_count {}", diag.degenerate_segment_count);
    let _ = writeln!(out, "diag.panel_count {}", diag.panel_count);
    let _ = writeln!(out, "diag.hidden_post_count {}", diag.hidden_post_count);
    let _ = writeln!(out, "diag.merged_remainder_count {}", diag.merged_remainder_count);
    let _ = writeln!(out, "diag.extent_fallback_used {}", diag.extent_fallback_used);
    for (idx, warning) in diag.warnings.iter().enumerate() {
        let _ = writeln!(out, "diag.warning.{idx} {warning}");
    }

    for placed in &assembly.panels {
        let _ = writeln!(
            out,
            "panel seg={} idx={} width={:.SNAPSHOT_DECIMALS$} start={} end={}",
            placed.segment,
            placed.panel.index,
            quantize_f64(placed.panel.width),
            placed.panel.show_start_post,
            placed.panel.show_end_post,
        );
    }

    for placement in &assembly.placements {
        let [x, y, z] = placement.position.map(quantize_f64);
        let rotation = quantize_f64(placement.rotation);
        let scale_x = quantize_f64(placement.scale_x);
        let _ = write!(
            out,
            "{} {x:.SNAPSHOT_DECIMALS$} {y:.SNAPSHOT_DECIMALS$} {z:.SNAPSHOT_DECIMALS$}",
            placement.kind.name(),
        );
        let _ = writeln!(
            out,
            " rot={rotation:.SNAPSHOT_DECIMALS$} sx={scale_x:.SNAPSHOT_DECIMALS$}{}",
            if placement.visible { "" } else { " hidden" },
        );
    }
    out
}
