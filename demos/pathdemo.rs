//! Terminal pathfinding demo using crossterm.
//!
//! Run: cargo run --bin pathdemo -- --engine wave --step

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use gridwalk_core::Grid;
use gridwalk_demos::{Options, Scene, build_engine, demo_map, explored};
use gridwalk_paths::{Path, SearchEngine};

fn main() {
    let opts = Options::parse();
    if let Err(e) = opts.validate() {
        Options::command().error(ErrorKind::ValueValidation, e).exit();
    }
    if let Err(e) = run(&opts) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(opts: &Options) -> io::Result<()> {
    let map = demo_map(opts);
    let mut engine = build_engine(&map, opts);
    let (start, target) = (opts.start(), opts.target());
    let mut wave = Grid::new(0, 0);
    let mut out = io::stdout();

    let found = if opts.step {
        engine.set_endpoints(start, target);
        engine.reset();
        engine.prepare_step();
        let empty = Path::new();
        let mut steps = 0usize;
        execute!(out, terminal::Clear(ClearType::All))?;
        loop {
            engine.export_wave(&mut wave);
            queue!(out, cursor::MoveTo(0, 0))?;
            draw(&mut out, &map, &wave, &empty, opts)?;
            queue!(out, Print(format!("step {steps}, explored {}\n", explored(&wave))))?;
            out.flush()?;
            if !engine.step() {
                break;
            }
            steps += 1;
            thread::sleep(Duration::from_millis(opts.delay_ms));
        }
        if engine.is_found() {
            engine.export_wave(&mut wave);
            engine.build_path();
        }
        queue!(out, cursor::MoveTo(0, 0))?;
        engine.is_found()
    } else {
        engine.set_endpoints(start, target);
        engine.reset();
        let found = engine.expand();
        engine.export_wave(&mut wave);
        if found {
            engine.build_path();
        }
        found
    };

    draw(&mut out, &map, &wave, engine.path(), opts)?;
    let summary = match engine.path().target() {
        Some(last) if found => format!(
            "{}: {start} -> {target}, {} steps, end value {}",
            opts.engine,
            engine.path().steps(),
            last.length_from_start
        ),
        _ => format!("{}: no path from {start} to {target}", opts.engine),
    };
    queue!(
        out,
        terminal::Clear(ClearType::CurrentLine),
        Print(format!("{summary} (explored {})\n", explored(&wave)))
    )?;
    out.flush()
}

fn draw(out: &mut impl Write, map: &Grid, wave: &Grid, path: &Path, opts: &Options) -> io::Result<()> {
    let scene = Scene {
        map,
        wave,
        path,
        start: opts.start(),
        target: opts.target(),
    };
    for y in 0..map.height() {
        for g in scene.row(y) {
            let (r, gr, b) = g.fg;
            queue!(out, SetForegroundColor(Color::Rgb { r, g: gr, b }), Print(g.ch))?;
        }
        queue!(out, ResetColor, Print('\n'))?;
    }
    Ok(())
}
