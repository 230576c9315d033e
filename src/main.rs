//! Dungeon Economy - Entry Point
//!
//! An interactive console over the simulation: advance ticks, build the
//! dungeon, answer cult offers and inspect the regulars' memory.

use std::io::{self, Write};
use std::path::Path;

use dungeon_economy::core::config::SimulationConfig;
use dungeon_economy::core::error::Result;
use dungeon_economy::dungeon::EditTool;
use dungeon_economy::memory::DirectoryBlobStore;
use dungeon_economy::simulation::{EventRecord, Simulation};

const MEMORY_DIR: &str = ".dungeon_memory";

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("dungeon_economy=info")
        .init();

    tracing::info!("Dungeon Economy starting...");

    // Optional config file as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(Path::new(&path))?,
        None => SimulationConfig::default(),
    };

    let mut sim = Simulation::new(config)?.with_blob_store(DirectoryBlobStore::new(MEMORY_DIR));
    print_events(&sim.drain_events());

    println!("\n=== DUNGEON ECONOMY ===");
    println!("Build a dungeon, bleed the adventurers, keep the town from noticing.");
    println!();
    println!("Commands:");
    println!("  tick / t                 - Advance simulation by one tick");
    println!("  run <n>                  - Run n simulation ticks");
    println!("  status / s               - Show meters and parties");
    println!("  map / m                  - Draw the dungeon");
    println!("  build <tool> <x> <y>     - room | mob | trap | loot | erase");
    println!("  accept / decline         - Answer the cult's offer");
    println!("  memory                   - List remembered regulars");
    println!("  forget                   - Clear saved memory");
    println!("  quit / q                 - Save and exit");
    println!();

    loop {
        print!("[tick {}] > ", sim.current_tick());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let words: Vec<&str> = input.split_whitespace().collect();
        match words.as_slice() {
            ["quit"] | ["q"] => break,
            ["tick"] | ["t"] => {
                let events = sim.tick();
                print_events(&events);
                if sim.is_halted() {
                    println!("The dungeon has fallen. Only status, map and quit remain useful.");
                }
            }
            ["run", n] => match n.parse::<u64>() {
                Ok(n) => {
                    let mut shown = 0usize;
                    for _ in 0..n {
                        if sim.is_halted() {
                            break;
                        }
                        let events = sim.tick();
                        shown += events.len();
                        print_events(&events);
                    }
                    println!(
                        "Now at tick {} ({} events).",
                        sim.current_tick(),
                        shown
                    );
                }
                Err(_) => println!("Usage: run <number>"),
            },
            ["status"] | ["s"] => display_status(&sim),
            ["map"] | ["m"] => display_map(&sim),
            ["build", tool, x, y] => {
                let parsed = (tool.parse::<EditTool>(), x.parse::<i32>(), y.parse::<i32>());
                match parsed {
                    (Ok(tool), Ok(x), Ok(y)) => {
                        sim.apply_edit(tool, x, y);
                        print_events(&sim.drain_events());
                    }
                    (Err(e), _, _) => println!("{}", e),
                    _ => println!("Usage: build <tool> <x> <y>"),
                }
            }
            ["accept"] => {
                if !sim.accept_offer() {
                    println!("No offer is open.");
                }
                print_events(&sim.drain_events());
            }
            ["decline"] => {
                if !sim.decline_offer() {
                    println!("No offer is open.");
                }
                print_events(&sim.drain_events());
            }
            ["memory"] => display_memory(&sim),
            ["forget"] => {
                sim.clear_memory();
                println!("Cleared saved memory.");
            }
            _ => println!(
                "Unknown command. Available: tick, run <n>, status, map, build, accept, decline, memory, forget, quit"
            ),
        }
    }

    if let Err(e) = sim.flush_memory() {
        tracing::warn!("Could not save memory on exit: {}", e);
    }
    println!("\nGoodbye! {} ticks elapsed.", sim.current_tick());
    Ok(())
}

fn print_events(events: &[EventRecord]) {
    for record in events {
        println!("{}", record);
    }
}

fn display_status(sim: &Simulation) {
    let state = sim.state();
    println!();
    println!("=== STATUS (tick {}) ===", state.tick);
    println!("Resources:         {}", state.resources);
    println!(
        "Political risk:    {}/{}",
        state.meters.political_risk,
        sim.config().pressure.political_threshold
    );
    println!(
        "Economic pressure: {}/{}",
        state.meters.economic_pressure,
        sim.config().pressure.economic_threshold
    );
    println!("Tension:           {}", state.meters.tension());
    if state.kill_bonus_ticks > 0 {
        println!("Marked regulars:   {} ticks left", state.kill_bonus_ticks);
    }
    match sim.current_offer() {
        Some(offer) => println!(
            "Cult offer:        {} ({} ticks) - {}",
            offer.kind,
            offer.expires_in,
            offer.kind.description(&sim.config().offers)
        ),
        None => println!("Cult offer:        none"),
    }
    if let Some(reason) = state.halted {
        println!("HALTED:            {}", reason);
    }

    println!();
    println!("Parties ({}):", state.parties.len());
    for party in &state.parties {
        let exit = if party.exit_known { "knows exit" } else { "exploring" };
        println!(
            "  {} {} - {} alive, hp {:.0}%, loot {}, seen {}, {}",
            party.kind,
            party.id,
            party.living_count(),
            party.avg_hp_fraction() * 100.0,
            party.total_loot(),
            party.knowledge.seen_count(),
            exit
        );
        for member in &party.members {
            println!(
                "    L{} {:<9} {:<16} hp {:>3}/{:<3} mp {:>3}/{:<3} at {}",
                member.level,
                member.class.to_string(),
                member.trait_kind.to_string(),
                member.hp,
                member.max_hp,
                member.mp,
                member.max_mp,
                member.position
            );
        }
    }
    println!();
}

fn display_map(sim: &Simulation) {
    let state = sim.state();
    let markers: Vec<_> = state
        .parties
        .iter()
        .flat_map(|p| p.living().map(|m| (m.position, '@')))
        .collect();
    print!("{}", state.grid.render_ascii(&markers));
}

fn display_memory(sim: &Simulation) {
    let store = &sim.state().store;
    println!("Regulars ({}/{}):", store.len(), store.pool_size());
    for token in store.roster() {
        let active = if sim.state().is_active(token) { " (active)" } else { "" };
        match store.recall(token) {
            Some(memory) => println!(
                "  {}{} - {} cells known, exit {}, {} members",
                token,
                active,
                memory.knowledge.seen_count(),
                if memory.exit_known { "known" } else { "unknown" },
                memory.member_templates.len()
            ),
            None => println!("  {}{} - no memory yet", token, active),
        }
    }
}
