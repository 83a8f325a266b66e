use approx::assert_relative_eq;
use fea_solver::prelude::*;

const E: f64 = 200e9;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Beam along X on `n` nodes, axial/out-of-plane/torsion restrained everywhere.
fn spring_beam(n: usize, length: f64, springs: &[(usize, f64)]) -> FEModel {
    init_logging();
    let mut model = FEModel::new();
    model.add_material("Steel", Material::isotropic(E, 0.3, 7850.0)).unwrap();
    model.add_section("R", Section::rectangular(0.3, 0.5)).unwrap();

    for i in 0..n {
        let name = format!("N{}", i + 1);
        let x = length * i as f64 / (n - 1) as f64;
        model.add_node(&name, Node::new(x, 0.0, 0.0)).unwrap();
        model
            .add_support(&name, Support::with_restraints(true, false, true, true, false, false))
            .unwrap();
    }
    for &(idx, k) in springs {
        model.add_support_spring(&format!("N{}", idx), Dof::DY, k).unwrap();
    }

    let last = format!("N{}", n);
    model.add_member("M1", Member::new("N1", &last, "Steel", "R")).unwrap();
    model
}

fn iz() -> f64 {
    Section::rectangular(0.3, 0.5).iz
}

#[test]
fn cantilever_tip_deflection_matches_closed_form() {
    let (p, l) = (10000.0, 10.0);
    let mut model = FEModel::new();
    model.add_material("Steel", Material::isotropic(E, 0.3, 7850.0)).unwrap();
    model.add_section("R", Section::rectangular(0.3, 0.5)).unwrap();
    model.add_node("N1", Node::new(0.0, 0.0, 0.0)).unwrap();
    model.add_node("N2", Node::new(l, 0.0, 0.0)).unwrap();
    model.add_member("M1", Member::new("N1", "N2", "Steel", "R")).unwrap();
    model.add_support("N1", Support::fixed()).unwrap();
    model.add_node_load("N2", NodeLoad::fy(-p, "Case 1")).unwrap();

    model.analyze(AnalysisOptions::linear().with_statics_check()).unwrap();

    let tip = model.node_displacement("N2", "Combo 1").unwrap();
    assert_relative_eq!(tip.dy, -p * l.powi(3) / (3.0 * E * iz()), max_relative = 1e-9);

    let base = model.node_reactions("N1", "Combo 1").unwrap();
    assert_relative_eq!(base.fy, p, max_relative = 1e-9);
    assert_relative_eq!(base.mz, p * l, max_relative = 1e-9);
}

#[test]
fn stiff_end_springs_act_as_simple_supports() {
    let (p, l) = (10000.0, 6.0);
    let mut model = spring_beam(3, l, &[(1, 1e12), (3, 1e12)]);
    model
        .add_member_point_load("M1", PointLoad::new(-p, l / 2.0, LoadDirection::Fy, "Case 1"))
        .unwrap();

    model.analyze_linear().unwrap();

    for end in ["N1", "N3"] {
        let rxn = model.node_reactions(end, "Combo 1").unwrap();
        assert_relative_eq!(rxn.fy, p / 2.0, max_relative = 1e-9);
    }
    // Interior node has no spring, so it reports no vertical reaction
    assert_eq!(model.node_reactions("N2", "Combo 1").unwrap().fy, 0.0);

    let mid = model.node_displacement("N2", "Combo 1").unwrap();
    assert_relative_eq!(mid.dy, -p * l.powi(3) / (48.0 * E * iz()), max_relative = 1e-6);
}

#[test]
fn point_moment_is_reacted_by_a_couple() {
    let (m, l) = (5000.0, 6.0);
    let mut model = spring_beam(3, l, &[(1, 1e12), (3, 1e12)]);
    model
        .add_member_point_load("M1", PointLoad::moment_z(m, 2.0, "Case 1"))
        .unwrap();

    model.analyze_linear().unwrap();

    let left = model.node_reactions("N1", "Combo 1").unwrap();
    let right = model.node_reactions("N3", "Combo 1").unwrap();
    assert_relative_eq!(left.fy, m / l, max_relative = 1e-8);
    assert_relative_eq!(right.fy, -m / l, max_relative = 1e-8);
}

#[test]
fn free_ends_carry_no_moment() {
    let springs: Vec<(usize, f64)> = (1..=9).map(|i| (i, 5.0e7)).collect();
    let mut model = spring_beam(9, 8.0, &springs);
    model
        .add_member_point_load("M1", PointLoad::new(-20000.0, 3.3, LoadDirection::Fy, "Case 1"))
        .unwrap();
    model
        .add_member_dist_load(
            "M1",
            DistributedLoad::new(-1000.0, -4000.0, 1.0, 6.5, LoadDirection::Fy, "Case 1"),
        )
        .unwrap();

    model.analyze(AnalysisOptions::linear().with_statics_check()).unwrap();

    let scale = 20000.0 * 8.0;
    let i_end = model.member_forces_i("M1", "Combo 1").unwrap();
    let j_end = model.member_forces_j("M1", "Combo 1").unwrap();
    assert!(i_end.moment_z.abs() < 1e-8 * scale, "i-end moment {}", i_end.moment_z);
    assert!(j_end.moment_z.abs() < 1e-8 * scale, "j-end moment {}", j_end.moment_z);

    // 20000 + (1000 + 4000) / 2 * 5.5
    let total: f64 = (1..=9)
        .map(|i| model.node_reactions(&format!("N{}", i), "Combo 1").unwrap().fy)
        .sum();
    assert_relative_eq!(total, 33750.0, max_relative = 1e-9);

    let summary = model.summary("Combo 1").unwrap();
    assert_eq!(summary.num_segments, 8);
    assert_eq!(summary.free_dofs, 9 * 3);
}

#[test]
fn dense_and_skyline_solvers_agree() {
    let springs: Vec<(usize, f64)> = (1..=12).map(|i| (i, 2.0e6 + 1.0e5 * i as f64)).collect();
    let build = || {
        let mut model = spring_beam(12, 11.0, &springs);
        model
            .add_member_point_load("M1", PointLoad::new(-7500.0, 4.2, LoadDirection::Fy, "Case 1"))
            .unwrap();
        model
            .add_member_point_load("M1", PointLoad::moment_z(3000.0, 9.1, "Case 1"))
            .unwrap();
        model
    };

    let mut sparse = build();
    sparse.analyze(AnalysisOptions::linear()).unwrap();
    let mut dense = build();
    dense.analyze(AnalysisOptions::linear().dense()).unwrap();

    for i in 1..=12 {
        let name = format!("N{}", i);
        let a = sparse.node_reactions(&name, "Combo 1").unwrap();
        let b = dense.node_reactions(&name, "Combo 1").unwrap();
        assert_relative_eq!(a.fy, b.fy, epsilon = 1e-6, max_relative = 1e-9);

        let a = sparse.node_displacement(&name, "Combo 1").unwrap();
        let b = dense.node_displacement(&name, "Combo 1").unwrap();
        assert_relative_eq!(a.dy, b.dy, epsilon = 1e-15, max_relative = 1e-9);
    }
}

#[test]
fn single_spring_reaction_opposes_displacement() {
    let (k, f) = (2.5e5, 1200.0);
    let mut model = FEModel::new();
    model.add_node("S", Node::new(0.0, 0.0, 0.0)).unwrap();
    model
        .add_support("S", Support::with_restraints(true, false, true, true, true, true))
        .unwrap();
    model.add_support_spring("S", Dof::DY, k).unwrap();
    model.add_node_load("S", NodeLoad::fy(-f, "Case 1")).unwrap();

    model.analyze_linear().unwrap();

    let d = model.node_displacement("S", "Combo 1").unwrap().dy;
    assert_relative_eq!(d, -f / k, max_relative = 1e-12);
    let r = model.node_reactions("S", "Combo 1").unwrap();
    assert_relative_eq!(r.fy, -k * d, max_relative = 1e-12);
}

#[test]
fn beam_without_springs_is_reported_unstable() {
    for options in [AnalysisOptions::linear(), AnalysisOptions::linear().dense()] {
        let mut model = spring_beam(4, 6.0, &[]);
        model
            .add_member_point_load("M1", PointLoad::new(-1.0, 3.0, LoadDirection::Fy, "Case 1"))
            .unwrap();
        let err = model.analyze(options).unwrap_err();
        assert!(err.is_instability(), "got {err}");
    }
}

#[test]
fn fine_spring_bed_reports_spring_forces() {
    let (p, l, n) = (10000.0, 10.0, 1001);
    let k = 1.0e6;
    let springs: Vec<(usize, f64)> = (1..=n).map(|i| (i, k)).collect();
    let mut model = spring_beam(n, l, &springs);
    model
        .add_member_point_load("M1", PointLoad::new(-p, l / 2.0, LoadDirection::Fy, "Case 1"))
        .unwrap();

    model.analyze(AnalysisOptions::linear()).unwrap();

    let mut total = 0.0;
    for i in 1..=n {
        let name = format!("N{}", i);
        let fy = model.node_reactions(&name, "Combo 1").unwrap().fy;
        let dy = model.node_displacement(&name, "Combo 1").unwrap().dy;
        assert_eq!(fy, -k * dy);
        total += fy;
    }
    assert_relative_eq!(total, p, max_relative = 1e-4);
}
