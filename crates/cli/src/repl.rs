//! Interactive loop over a loaded engine.

use cube::{Cube, SolveOptions, StatusCode, CUBE_ID, DEFAULT_STEP};
use dialoguer::Input;

const HELP: &str = "\
[Help]
    solve <src> [tgt=cid] [N=30] [best=1]  -- find [best] solution from <src> to [tgt] within [N] steps
    color <maneuver> [cube=cid]            -- color by applying maneuver to cube
    perm  <maneuver>                       -- decompose maneuver to cubies permutation

where:
    <...>           -- required argument
    [...]           -- optional argument
    src,tgt,cube    :: the color configuration; eg: `UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB`
    maneuver        :: the move sequence;       eg: `FRL'B2D`, `\"(DR'F2L){7} BD2\"`
    cid             :: the solved cube";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    Solve {
        src: String,
        tgt: String,
        step: u32,
        best: bool,
    },
    Color {
        maneuver: String,
        cube: String,
    },
    Perm {
        maneuver: String,
    },
}

impl ReplCommand {
    /// Parse one input line. Arguments are whitespace separated; double
    /// quotes group an argument containing spaces.
    pub fn parse(line: &str) -> Result<Self, String> {
        let args = split_args(line);
        let arg = |i: usize| args.get(i).map(String::as_str).unwrap_or("");

        match arg(0) {
            ":q" => Ok(ReplCommand::Quit),
            ":h" => Ok(ReplCommand::Help),
            "solve" => {
                let step = match arg(3) {
                    "" => DEFAULT_STEP,
                    s => s
                        .parse()
                        .map_err(|_| "solve: invalid arguments".to_string())?,
                };
                let best = match arg(4) {
                    "" => true,
                    s => s
                        .parse::<u32>()
                        .map_err(|_| "solve: invalid arguments".to_string())?
                        != 0,
                };
                Ok(ReplCommand::Solve {
                    src: cube_or_id(arg(1)),
                    tgt: cube_or_id(arg(2)),
                    step,
                    best,
                })
            }
            "color" => Ok(ReplCommand::Color {
                maneuver: arg(1).to_string(),
                cube: cube_or_id(arg(2)),
            }),
            "perm" => Ok(ReplCommand::Perm {
                maneuver: arg(1).to_string(),
            }),
            other => Err(format!("unsupported command `{}`", other)),
        }
    }
}

/// `cid` and an omitted argument both mean the solved cube.
fn cube_or_id(arg: &str) -> String {
    match arg {
        "" | "cid" => CUBE_ID.to_string(),
        s => s.to_string(),
    }
}

fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        args.push(current);
    }
    args
}

/// Evaluate a command against the engine. `Quit` and `Help` yield `None`.
pub fn eval(cube: &Cube, cmd: &ReplCommand) -> Option<String> {
    match cmd {
        ReplCommand::Quit | ReplCommand::Help => None,
        ReplCommand::Solve {
            src,
            tgt,
            step,
            best,
        } => {
            let opts = SolveOptions::default()
                .dest(tgt.clone())
                .step(*step)
                .best(*best);
            let r = cube.solve_ultimate(src, &opts);
            Some(match r.status_code {
                StatusCode::Ok => r.solution,
                StatusCode::InvalidSrc => "!!! the source cube is invalid".to_string(),
                StatusCode::InvalidTgt => "!!! the target cube is invalid".to_string(),
                StatusCode::Unsolvable => "!!! unsolvable".to_string(),
                StatusCode::NotFound => {
                    "!!! solution not found since N is too small".to_string()
                }
                StatusCode::UnknownErr => "!!! unknown error".to_string(),
            })
        }
        ReplCommand::Color { maneuver, cube: c } => Some(cube.get_facecube(maneuver, Some(c))),
        ReplCommand::Perm { maneuver } => Some(cube.get_permutation(maneuver)),
    }
}

pub fn run(cube: &Cube) {
    println!("Welcome! This is a Rubik's cube solver.");
    println!("(* `:h` for help, `:q` for quit *)");

    let mut no = 0usize;
    loop {
        let line: String = match Input::new()
            .with_prompt(format!("In [{}] :=", no))
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(e) => {
                tracing::debug!(error = %e, "input closed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match ReplCommand::parse(&line) {
            Ok(ReplCommand::Quit) => break,
            Ok(ReplCommand::Help) => println!("{}", HELP),
            Ok(cmd) => {
                if let Some(out) = eval(cube, &cmd) {
                    println!("Out[{}] => {}", no, out);
                    no += 1;
                }
            }
            Err(msg) => println!("!!! {}", msg),
        }
    }
    println!("Goodbye!");
}
