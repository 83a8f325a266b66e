//! Grade Beam Example - Concrete beam over a subgrade modulus sweep

use gradebeam::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Grade Beam Example: Concrete Beam on Springs ===\n");

    // 10 m x 200 mm x 800 mm concrete beam (N, mm, MPa)
    let beam = BeamProperties::default();
    println!("Beam:");
    println!("  L = {} mm, w = {} mm, h = {} mm", beam.length, beam.width, beam.height);
    println!("  E = {} MPa, A = {:.0} mm², Iz = {:.4e} mm⁴", beam.e, beam.area, beam.iz);

    //   12100 N + 8.925e6 N·mm        -2200 N
    //        |                          |
    //   ~~~~~v~~~~~ -12.5 N/mm ~~~~~~~~~v~~~~~~~~~~~
    //   =============================================
    //   ^    ^    ^    ^    ^    ^    ^    ^    ^   ^
    let loads = LoadSet::new()
        .with_point_load(12100.0, 250.0)
        .with_point_moment(11.9 * 0.75 * 1e6, 250.0)
        .with_point_load(-2200.0, 2750.0)
        .with_distributed_load(DistributedLoad::uniform(-12.5, 0.0, 3000.0));
    println!("\nNet downward load: {:.1} N", loads.total_downward_load());

    let moduli = parse_numeric_list("subgrade_moduli", "0.5, 1, 5, 10")?;
    let n_springs = 10;
    println!("Subgrade moduli: {} N/mm³ on {} springs\n", format_numeric_list(&moduli), n_springs);

    let table = run_sweep_with(&beam, &moduli, n_springs, &loads, &SweepOptions::parallel());

    println!("--- Spring Reactions (N, positive up) ---");
    print!("{}", table);

    println!("\n--- Peak Reactions ---");
    for row in table.successes() {
        if let Some(reactions) = row.reactions() {
            if let Some((i, value)) = reactions.peak() {
                println!(
                    "  k_s = {:>5}: {:>10.1} N at {} (x = {:.0} mm)",
                    row.subgrade_modulus, value, reactions.nodes[i], reactions.positions[i]
                );
            }
        }
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
