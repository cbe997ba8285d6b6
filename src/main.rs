use std::env;
use std::io::{self, Read, Write};
use std::process;

use log::info;

use utvpi::{find_oa, find_oa_lp, remove_redundant, MicroLp, System, DEFAULT_PRECISION};

/* Reads a system of linear inequalities from stdin, drops the implied
 * ones, and prints its UTVPI over-approximation. The projector runs by
 * default; --lp switches to the LP extractor and --reduce filters
 * redundant rows after every projection step. Diagnostics go to the
 * log (RUST_LOG), never to stdout, so an infeasible input produces the
 * single line "Infeasible!" and nothing else.
 */
fn main() {
    env_logger::init();

    let mut use_lp = false;
    let mut reduce = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--lp" => use_lp = true,
            "--reduce" => reduce = true,
            _ => {
                eprintln!("usage: utvpi [--lp] [--reduce] < system");
                process::exit(2);
            }
        }
    }

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .expect("reading stdin");
    let mut system = System::parse(&input);
    info!(
        "read {} lines over {} variables",
        system.nlines(),
        system.nvars()
    );

    let solver = MicroLp;
    remove_redundant(&mut system, &solver);
    info!("{} lines after redundancy elimination", system.nlines());

    let cover = if use_lp {
        find_oa_lp(&system, &solver, DEFAULT_PRECISION)
    } else {
        find_oa(&system, if reduce { Some(&solver) } else { None })
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cover {
        Ok(oa) => oa.print(&mut out).expect("writing stdout"),
        Err(infeasible) => writeln!(out, "{}", infeasible).expect("writing stdout"),
    }
}
