//! End-to-end mortise machining scenario: a 70 x 30 mm slot cleared from
//! 102 x 102 mm stock with a 12 mm end mill, 60 mm deep in 10 mm steps.

use timbercam_adaptive::{
    AdaptiveOperation, CancelToken, CutSide, DepthParams, Frame, MotionKind, MotionVerb,
    OperationKind,
};
use timbercam_math::{Point3, Vec3};
use timbercam_outline::{mortise_slot, stock_rectangle};
use timbercam_solver::RingSolver;

fn mortise_operation() -> AdaptiveOperation {
    AdaptiveOperation {
        operation: OperationKind::Clearing,
        side: CutSide::Inside,
        tool_diameter: 12.0,
        stepover_percent: 20.0,
        depths: DepthParams {
            clearance_height: 80.0,
            safe_height: 75.0,
            start_depth: 0.0,
            step_down: 10.0,
            finish_step: 0.0,
            final_depth: -60.0,
        },
        ..AdaptiveOperation::default()
    }
}

#[test]
fn depth_passes_step_down_to_final_depth() {
    let passes = mortise_operation().depths.passes();
    assert_eq!(passes.len(), 6);
    for (i, z) in passes.iter().enumerate() {
        assert!((z - (-10.0 * (i + 1) as f64)).abs() < 1e-9);
    }
}

#[test]
fn solver_produces_one_collision_free_region() {
    let mut op = mortise_operation();
    let solver = RingSolver::new();
    op.execute(
        &mortise_slot(70.0, 30.0),
        &stock_rectangle(102.0, 102.0),
        &solver,
        &CancelToken::new(),
    )
    .unwrap();

    // Inspect the solver output stored in the cache via a direct solve of
    // the same request: convex single-region case, nothing crosses
    // uncleared stock.
    use timbercam_adaptive::{AdaptiveSolver, SolveRequest};
    let request = SolveRequest {
        tool_diameter: 12.0,
        tolerance: 0.1,
        stepover_percent: 20.0,
        helix_diameter_limit: 0.0,
        operation: OperationKind::Clearing,
        side: CutSide::Inside,
        force_inside_out: false,
        keep_tool_down_ratio: 3.0,
        stock_to_leave: 0.0,
        base: mortise_slot(70.0, 30.0).discretize(1e-4).unwrap(),
        stock: stock_rectangle(102.0, 102.0).discretize(1e-4).unwrap(),
    };
    let result = solver.solve(&request, &CancelToken::new());
    assert_eq!(result.regions.len(), 1);
    for path in &result.regions[0].paths {
        assert_ne!(path.kind, MotionKind::LinkNotClear);
    }

    // Every cutting point stays inside the slot, one tool radius in.
    for path in &result.regions[0].paths {
        for p in &path.points {
            assert!(p.x.abs() <= 15.0 - 6.0 + 1e-6);
            assert!(p.y.abs() <= 35.0 - 6.0 + 1e-6);
        }
    }
}

#[test]
fn program_has_one_entry_per_pass() {
    let mut op = mortise_operation();
    let program = op
        .execute(
            &mortise_slot(70.0, 30.0),
            &stock_rectangle(102.0, 102.0),
            &RingSolver::new(),
            &CancelToken::new(),
        )
        .unwrap();
    assert!(!program.is_empty());

    // One region and six passes: exactly six entries, all annotated.
    let entries: Vec<_> = program
        .commands
        .iter()
        .filter(|c| c.comment.is_some())
        .collect();
    assert_eq!(entries.len(), 6);

    // Every command is fully dimensioned after placement.
    for cmd in &program.commands {
        assert!(cmd.position().is_some());
    }

    // The program ends retracted at clearance height.
    let last = program.commands.last().unwrap();
    assert_eq!(last.verb, MotionVerb::Rapid);
    assert_eq!(last.z, Some(80.0));
}

#[test]
fn placed_program_lands_on_the_joint_face() {
    // The same mortise on a post face: normal -X, direction +Y, 200 mm up.
    let mut op = mortise_operation();
    op.frame = Frame::new(
        Point3::new(0.0, 0.0, 200.0),
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::y(),
    );
    let mut canonical = mortise_operation();

    let placed = op
        .execute(
            &mortise_slot(70.0, 30.0),
            &stock_rectangle(102.0, 102.0),
            &RingSolver::new(),
            &CancelToken::new(),
        )
        .unwrap();
    let reference = canonical
        .execute(
            &mortise_slot(70.0, 30.0),
            &stock_rectangle(102.0, 102.0),
            &RingSolver::new(),
            &CancelToken::new(),
        )
        .unwrap();

    assert_eq!(placed.len(), reference.len());

    // Rigid placement: pairwise distances survive unchanged.
    let positions = |program: &timbercam_adaptive::MotionProgram| {
        program
            .commands
            .iter()
            .map(|c| c.position().unwrap())
            .collect::<Vec<_>>()
    };
    let a = positions(&placed);
    let b = positions(&reference);
    for i in (0..a.len()).step_by(97) {
        for j in (0..a.len()).step_by(83) {
            let da = ((a[i].0 - a[j].0).powi(2)
                + (a[i].1 - a[j].1).powi(2)
                + (a[i].2 - a[j].2).powi(2))
            .sqrt();
            let db = ((b[i].0 - b[j].0).powi(2)
                + (b[i].1 - b[j].1).powi(2)
                + (b[i].2 - b[j].2).powi(2))
            .sqrt();
            assert!((da - db).abs() < 1e-6);
        }
    }

    // Clearance retracts now move along -X instead of +Z.
    let last = placed.commands.last().unwrap();
    assert!((last.x.unwrap() - (-80.0)).abs() < 1e-6);
}

#[test]
fn cancelled_solve_still_generates_a_valid_program() {
    let mut op = mortise_operation();
    let cancel = CancelToken::new();
    cancel.cancel();

    let program = op
        .execute(
            &mortise_slot(70.0, 30.0),
            &stock_rectangle(102.0, 102.0),
            &RingSolver::new(),
            &cancel,
        )
        .unwrap();
    // Cancelled before the first ring: empty program, no error.
    assert!(program.is_empty());
}
