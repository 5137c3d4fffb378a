use crate::*;
use approx::assert_abs_diff_eq;

fn assert_point(p: [f64; 2], expected: [f64; 2]) {
    assert_abs_diff_eq!(p[0], expected[0], epsilon = 1e-9);
    assert_abs_diff_eq!(p[1], expected[1], epsilon = 1e-9);
}

fn wide_limits() -> Limits {
    Limits([Limit { min: -360., max: 720. }; 3])
}

#[test]
fn clamp_is_idempotent() {
    let limit = Limit { min: 5., max: 40. };
    for x in [-100., 0., 5., 22.5, 40., 40.01, 1e9] {
        let once = limit.clamp(x);
        assert_eq!(limit.clamp(once), once);
        assert!((5. ..=40.).contains(&once));
    }
    assert_eq!(limit.clamp(100.), 40.);
    assert!(limit.at_limit(40.005));
    assert!(limit.at_limit_toward(5., -0.4));
    assert!(!limit.at_limit_toward(5., 0.4));
}

#[test]
fn invalid_limit_is_rejected() {
    let mut limits = Limits::default();
    let err = limits.set(Joint::Middle, 10., 5.).unwrap_err();
    assert_eq!(err.joint, Joint::Middle);
    assert_eq!(limits[Joint::Middle], Limit::FULL);
    assert!(limits.set(Joint::SeatPan, f64::NAN, 5.).is_err());
    limits.set(Joint::Backrest, 5., 100.).unwrap();
    assert_eq!(limits[Joint::Backrest], Limit { min: 5., max: 100. });
}

#[test]
fn round_and_normalize() {
    assert_eq!(round_half(0.25), 0.5);
    assert_eq!(round_half(-0.25), 0.);
    assert_eq!(round_half(1.74), 1.5);
    assert_eq!(round_half(1.76), 2.);
    assert_eq!(norm_half_turn(180.), 180.);
    assert_eq!(norm_half_turn(-180.), 180.);
    assert_eq!(norm_half_turn(540.), 180.);
    assert_eq!(Angles::new(10., 250., 0.).seat_pan(), 120.);
}

#[test]
fn forward_kinematics() {
    let geo = Geometry::default();
    let pose = geo.pose(&Angles::new(0., 0., 0.));
    assert_point(pose.base, [240., 400.]);
    assert_point(pose.middle_end, [60., 400.]);
    assert_point(pose.seat_end, [220., 400.]);
    assert_point(pose.backrest_end, [370., 400.]);
    let a = Angles::new(90., 90., 90.);
    let pose = geo.pose(&a);
    assert_point(pose.middle_end, [240., 220.]);
    assert_point(pose.seat_end, [400., 220.]);
    assert_point(pose.backrest_end, [400., 70.]);
    // Deterministic and consistent with the single-link functions
    assert_eq!(geo.pose(&a), pose);
    assert_eq!(geo.backrest_end(&a), pose.backrest_end);
}

#[test]
fn layout() {
    let mut geo = Geometry::default();
    geo.layout(801., 300.);
    assert_eq!(geo.base, [401., 346.]);
    geo.layout(1000., 900.);
    assert_eq!(geo.base, [500., 600.]);
}

#[test]
fn hover_priority() {
    let geo = Geometry::default();
    let flat = Angles::new(0., 0., 0.);
    assert_eq!(geo.hover(&flat, [300., 405.]), Some(Joint::Backrest));
    // Middle and seat-pan links overlap here
    assert_eq!(geo.hover(&flat, [100., 405.]), Some(Joint::SeatPan));
    let a = Angles::default();
    let [start, end] = geo.pose(&a).link(Joint::Middle);
    let mid = [(start[0] + end[0]) / 2., (start[1] + end[1]) / 2.];
    assert_eq!(geo.hover(&a, mid), Some(Joint::Middle));
    assert_eq!(geo.hover(&a, [0., 0.]), None);
}

#[test]
fn sum_and_diff_invariants() {
    let rules = Rules::default();
    let mut a = Angles::new(100., 120., 30.);
    for _ in 0..50 {
        assert!(Control::Sum(Dir::Up).step(&mut a, &rules));
    }
    assert_abs_diff_eq!(a.a1 - a.a2, -20., epsilon = 1e-9);
    assert_abs_diff_eq!(a.a1, 120., epsilon = 1e-9);
    let mut a = Angles::new(100., 120., 30.);
    for _ in 0..50 {
        assert!(Control::Diff(Dir::Down).step(&mut a, &rules));
    }
    assert_abs_diff_eq!(a.a1 + a.a2, 220., epsilon = 1e-9);
    assert_abs_diff_eq!(a.a1, 80., epsilon = 1e-9);
    assert_eq!(a.a3, 30.);
}

#[test]
fn swap_on_limit() {
    let rules = Rules { limits: Limits::wheelchair(), ..Rules::default() };
    let mut a = Angles::new(40., 50., 30.);
    assert!(Control::Swap(Joint::Middle, Dir::Up).step(&mut a, &rules));
    assert_eq!(a.a1, 40.);
    assert_abs_diff_eq!(a.a2, 49.6, epsilon = 1e-9);
    let mut a = Angles::new(30., 50., 30.);
    Control::from(Button::up(Actuator::Z1)).step(&mut a, &rules);
    assert_abs_diff_eq!(a.a1, 30.4, epsilon = 1e-9);
    assert_eq!(a.a2, 50.);
    // Z-2 at the lower bound of angle2 swaps to angle1 reversed
    let mut a = Angles::new(30., 5., 30.);
    Control::from(Button::down(Actuator::Z2)).step(&mut a, &rules);
    assert_abs_diff_eq!(a.a1, 30.4, epsilon = 1e-9);
    assert_eq!(a.a2, 5.);
}

#[test]
fn single_step_at_limit() {
    let rules = Rules { limits: Limits::wheelchair(), ..Rules::default() };
    let mut a = Angles::new(30., 30., 100.);
    assert!(!Control::Single(Joint::Backrest, Dir::Up).step(&mut a, &rules));
    assert!(Control::Single(Joint::Backrest, Dir::Down).step(&mut a, &rules));
    assert_abs_diff_eq!(a.a3, 99.6, epsilon = 1e-9);
}

#[test]
fn ratio_scenario() {
    let rules = Rules::default();
    let mut a = Angles::new(20., 20., 30.);
    assert!(Control::Ratio(Dir::Up).step(&mut a, &rules));
    assert_abs_diff_eq!(a.a1, 20.5, epsilon = 1e-9);
    assert_abs_diff_eq!(a.a2, 19.6, epsilon = 1e-9);
    let mut rules = rules;
    rules.set_ratio(5.);
    assert_eq!(rules.ratio, 2.);
    rules.set_ratio(f64::NAN);
    assert_eq!(rules.ratio, 2.);
}

#[test]
fn coupled_policy() {
    let mut rules = Rules { limits: Limits::wheelchair(), allow_partial: false, ..Rules::default() };
    let mut a = Angles::new(39.8, 50., 30.);
    assert!(!Control::Sum(Dir::Up).step(&mut a, &rules));
    assert_eq!(a, Angles::new(39.8, 50., 30.));
    rules.allow_partial = true;
    assert!(Control::Sum(Dir::Up).step(&mut a, &rules));
    assert_eq!(a.a1, 40.);
    assert_abs_diff_eq!(a.a2, 50.4, epsilon = 1e-9);
    // The ratio step clamps each joint on its own
    rules.allow_partial = false;
    assert!(Control::Ratio(Dir::Up).step(&mut a, &rules));
    assert_eq!(a.a1, 40.);
    assert_abs_diff_eq!(a.a2, 50.4 - 0.4, epsilon = 1e-9);
}

#[test]
fn joystick_policy() {
    let mut rules = Rules { limits: Limits::wheelchair(), allow_partial: false, ..Rules::default() };
    let up = Control::Joystick(Deflection::new(0., 1.));
    let mut a = Angles::new(39.95, 50., 30.);
    assert!(!up.step(&mut a, &rules));
    assert_eq!(a, Angles::new(39.95, 50., 30.));
    rules.allow_partial = true;
    assert!(up.step(&mut a, &rules));
    assert_eq!(a.a1, 40.);
    assert_abs_diff_eq!(a.a2, 50.1, epsilon = 1e-9);
    assert_eq!(a.a3, 30.);
}

#[test]
fn joystick_blend() {
    assert_eq!(Deflection::new(0.05, 0.05).delta(), None);
    let [d1, d2] = Deflection::new(0., 1.).delta().unwrap();
    assert_abs_diff_eq!(d1, 0.1, epsilon = 1e-12);
    assert_abs_diff_eq!(d2, 0.1, epsilon = 1e-12);
    let [d1, d2] = Deflection::new(1., 0.).delta().unwrap();
    assert_abs_diff_eq!(d1, 0.1, epsilon = 1e-12);
    assert_abs_diff_eq!(d2, -0.1, epsilon = 1e-12);
    let [d1, d2] = Deflection::new(-1., 0.).delta().unwrap();
    assert_abs_diff_eq!(d1, -0.1, epsilon = 1e-12);
    assert_abs_diff_eq!(d2, 0.1, epsilon = 1e-12);
    let [d1, d2] = Deflection::new(0.6, 0.6).delta().unwrap();
    assert_abs_diff_eq!(d1, 0.06, epsilon = 1e-12);
    assert_abs_diff_eq!(d2, 0., epsilon = 1e-12);
    // Over-deflection is scaled into the unit disk
    assert_abs_diff_eq!(Deflection::new(3., 4.).magnitude(), 1., epsilon = 1e-12);
    let knob = Deflection::from_knob(0., -100., 50.);
    assert_abs_diff_eq!(knob.y, 1., epsilon = 1e-12);
    assert_eq!(Deflection::from_knob(1., 1., 0.), Deflection::default());
}

#[test]
fn hold_rate_limit() {
    let rules = Rules::default();
    let mut hold = Hold::new(Button::up(Actuator::Act1));
    let mut a = Angles::default();
    assert!(!hold.tick(&mut a, &rules));
    assert!(!hold.tick(&mut a, &rules));
    assert!(hold.tick(&mut a, &rules));
    assert_abs_diff_eq!(a.a1, 30.4, epsilon = 1e-9);
    assert_eq!(hold.button.label(), "act1-up");
    assert_eq!(Button::down(Actuator::Z1).label(), "z1-down");
}

#[test]
fn seek_arrival() {
    let limits = Limits::default();
    let seek = Seek::new([Some(15.), None, None], &limits);
    let mut a = Angles::new(14.95, 20., 20.);
    assert!(seek.tick(&mut a, &limits));
    assert_eq!(a, Angles::new(15., 20., 20.));
    let mut a = Angles::new(10., 20., 20.);
    let seek = Seek::new([Some(11.), None, None], &limits);
    assert!(!seek.tick(&mut a, &limits));
    assert_abs_diff_eq!(a.a1, 10.08, epsilon = 1e-12);
    let seek = Seek::new([Some(100.), None, None], &Limits::wheelchair());
    assert_eq!(seek.targets[0], Some(40.));
    assert!(Seek::default().is_empty());
    let mut a = Angles::default();
    assert!(Seek::default().tick(&mut a, &limits));
    assert_eq!(a, Angles::default());
}

#[test]
fn wraparound_drag() {
    let geo = Geometry::default();
    let limits = wide_limits();
    let mut a = Angles::new(350., 30., 30.);
    for i in 0..=40 {
        let dir = 350. + i as f64 * 0.5;
        let cursor = geo.base.pla(100., dir - 180.);
        let prev = a.a1;
        if let Some(deg) = drag_angle(Joint::Middle, cursor, &geo, &a, &limits) {
            assert!((deg - prev).abs() <= DRAG_QUANTUM + 1e-9);
            a.a1 = deg;
        }
    }
    assert_eq!(a.a1, 370.);
}

#[test]
fn drag_child_joints() {
    let geo = Geometry::default();
    let limits = Limits::default();
    let a = Angles::default();
    let cursor = geo.middle_end(&a).pla(100., -20.);
    assert_eq!(drag_angle(Joint::SeatPan, cursor, &geo, &a, &limits), Some(50.));
    let cursor = geo.seat_end(&a).pla(100., -60.);
    assert_eq!(drag_angle(Joint::Backrest, cursor, &geo, &a, &limits), Some(60.));
    // Same angle, no mutation
    let cursor = geo.seat_end(&a).pla(100., a.backrest_dir());
    assert_eq!(drag_angle(Joint::Backrest, cursor, &geo, &a, &limits), None);
}

#[test]
fn recorder_window() {
    let mut rec = Recorder::new(0.);
    let a = Angles::default();
    assert!(rec.record_if_due(0., &a, None));
    assert!(!rec.record_if_due(25., &a, None));
    for t in 1..=800 {
        rec.record_if_due(t as f64 * 50., &a, None);
    }
    assert_eq!(rec.samples().next().unwrap().time, 10050.);
    assert_eq!(rec.latest().unwrap().time, 40000.);
    assert_eq!(rec.len(), 600);
    rec.clear(50000.);
    assert!(rec.is_empty());
    assert!(rec.record_if_due(50010., &a, Some("z1-up")));
    assert_eq!(rec.latest().unwrap().time, 10.);
    assert_eq!(rec.latest().unwrap().seat_pan, 0.);
}

#[test]
fn formula_eval() {
    let a = Angles::new(20., 30., 5.);
    let eval = |s: &str| Formula::parse(s).unwrap().eval(&a).unwrap();
    assert_eq!(eval("angle1 * 0.5 + max(angle3, 10)"), 20.);
    assert_eq!(eval("-2^2"), -4.);
    assert_eq!(eval("2^3^2"), 512.);
    assert_eq!(eval("2^-1"), 0.5);
    assert_eq!(eval("(angle1 + angle2) / 2 - 1e1"), 15.);
    assert_eq!(eval("min(3, 1, 2)"), 1.);
    assert_eq!(eval("pow(2, 10)"), 1024.);
    assert_eq!(eval("abs(angle1 - angle2)"), 10.);
    assert_abs_diff_eq!(eval("sin(PI / 2)"), 1., epsilon = 1e-12);
    assert_abs_diff_eq!(eval("cos(angle2 * pi / 180)"), 3f64.sqrt() / 2., epsilon = 1e-12);
    assert_eq!(Formula::parse(" angle1 + 1 ").unwrap().to_string(), "angle1 + 1");
}

#[test]
fn formula_errors() {
    use crate::formula::FormulaError::*;
    assert_eq!(Formula::parse(""), Err(Empty));
    assert_eq!(Formula::parse("angle1 $"), Err(Lex(7, '$')));
    assert_eq!(Formula::parse("foo + 1"), Err(Unknown("foo".to_string())));
    assert_eq!(Formula::parse("pow(1)"), Err(Arity("pow", "2", 1)));
    assert!(matches!(Formula::parse("(1 + 2"), Err(Parse(_))));
    assert!(matches!(Formula::parse("1 2"), Err(Parse(_))));
    assert!(matches!(Formula::parse("sin 1"), Err(Parse(_))));
    let a = Angles::default();
    assert_eq!(Formula::parse("1 / 0").unwrap().eval(&a), Err(NonFinite));
    assert_eq!(Formula::parse("sqrt(-1)").unwrap().eval(&a), Err(NonFinite));
}

#[test]
fn formula_nesting() {
    use crate::formula::FormulaError::TooComplex;
    let a = Angles::default();
    let nested = |n: usize| format!("{}angle1{}", "(".repeat(n), ")".repeat(n));
    assert_eq!(Formula::parse(&nested(MAX_DEPTH)).unwrap().eval(&a), Ok(30.));
    assert_eq!(Formula::parse(&nested(MAX_DEPTH + 1)), Err(TooComplex));
    assert_eq!(Formula::parse(&nested(20_000)), Err(TooComplex));
    assert_eq!(Formula::parse(&"-".repeat(20_000)), Err(TooComplex));
    assert_eq!(Formula::parse(&format!("{}1", "sin(".repeat(20_000))), Err(TooComplex));
    let sum = |n: usize| vec!["1"; n].join(" + ");
    assert_eq!(Formula::parse(&sum(50)).unwrap().eval(&a), Ok(50.));
    assert_eq!(Formula::parse(&sum(MAX_OPS + 1)).unwrap().eval(&a), Ok(257.));
    assert_eq!(Formula::parse(&sum(MAX_OPS + 2)), Err(TooComplex));
    assert_eq!(Formula::parse(&sum(300_000)), Err(TooComplex));
    assert_eq!(Formula::parse(&vec!["2"; 20_000].join("^")), Err(TooComplex));
}

#[test]
fn binding_apply() {
    let limits = Limits::wheelchair();
    let binding = Binding::new(Joint::Backrest, "angle1 * 4").unwrap();
    let mut a = Angles::new(30.1, 30., 30.);
    assert!(binding.apply(&mut a, &limits).unwrap());
    assert_eq!(a.a3, 100.);
    let binding = Binding::new(Joint::Backrest, "angle1 + 10.2").unwrap();
    assert!(binding.apply(&mut a, &limits).unwrap());
    assert_eq!(a.a3, 40.5);
    assert!(!binding.apply(&mut a, &limits).unwrap());
}

#[test]
fn driver_precedence() {
    let mut sim = Sim::new();
    assert!(sim.handle(Input::Press(Button::up(Actuator::Act1))).unwrap());
    assert!(!sim.handle(Input::Joystick(0., 1.)).unwrap());
    assert!(!sim.handle(Input::GoTo(0)).unwrap());
    assert_eq!(sim.driver().name(), "button");
    assert!(sim.handle(Input::DragStart(Joint::Middle)).unwrap());
    assert_eq!(sim.driver().dragging(), Some(Joint::Middle));
    assert!(!sim.handle(Input::Release).unwrap());
    assert!(!sim.handle(Input::Press(Button::up(Actuator::Act2))).unwrap());
    assert!(sim.handle(Input::DragEnd).unwrap());
    assert!(sim.driver().is_idle());
    assert!(sim.handle(Input::GoTo(0)).unwrap());
    assert!(sim.handle(Input::Joystick(0., 1.)).unwrap());
    assert_eq!(sim.driver().name(), "joystick");
    assert!(sim.handle(Input::JoystickRelease).unwrap());
    assert!(sim.driver().is_idle());
    assert_eq!(sim.handle(Input::GoTo(9)), Err(SimError::Preset(9)));
}

#[test]
fn sim_button_and_samples() {
    let mut sim = Sim::new();
    sim.handle(Input::Press(Button::up(Actuator::Tilt))).unwrap();
    for tick in 0..30 {
        sim.tick(tick as f64 * 1000. / 60.).unwrap();
    }
    let a = *sim.angles();
    assert_abs_diff_eq!(a.a1, 34., epsilon = 1e-9);
    assert_abs_diff_eq!(a.a1 + a.a2, 60., epsilon = 1e-9);
    assert!(sim.samples().all(|s| s.label == Some("tilt-up")));
    assert_eq!(sim.samples().len(), 10);
    sim.handle(Input::Release).unwrap();
    assert!(!sim.tick(1000.).unwrap());
    assert_eq!(sim.samples().last().unwrap().label, None);
}

#[test]
fn sim_animation() {
    let mut sim = Sim::new();
    sim.handle(Input::GoTo(0)).unwrap();
    for tick in 0..400 {
        sim.tick(tick as f64 * 1000. / 60.).unwrap();
    }
    assert!(sim.driver().is_idle());
    assert_eq!(*sim.angles(), Angles::new(15., 25., 50.));
    sim.handle(Input::Animate([None, None, Some(20.)])).unwrap();
    for tick in 400..1000 {
        sim.tick(tick as f64 * 1000. / 60.).unwrap();
    }
    assert_eq!(*sim.angles(), Angles::new(15., 25., 20.));
}

#[test]
fn sim_animation_cancelled() {
    let mut sim = Sim::new();
    sim.handle(Input::GoTo(0)).unwrap();
    for tick in 0..5 {
        sim.tick(tick as f64 * 20.).unwrap();
    }
    assert!(sim.angles().a1 < 30.);
    let seeked = *sim.angles();
    sim.handle(Input::Press(Button::up(Actuator::Act3))).unwrap();
    assert_eq!(sim.driver().name(), "button");
    for tick in 5..11 {
        sim.tick(tick as f64 * 20.).unwrap();
    }
    let a = *sim.angles();
    assert_eq!((a.a1, a.a2), (seeked.a1, seeked.a2));
    assert!(a.a3 > seeked.a3);
    // The animation does not resume after the release
    sim.handle(Input::Release).unwrap();
    assert!(sim.driver().is_idle());
    assert!(!sim.tick(220.).unwrap());
    assert_eq!(*sim.angles(), a);

    let mut sim = Sim::new();
    sim.handle(Input::GoTo(0)).unwrap();
    sim.tick(0.).unwrap();
    let seeked = *sim.angles();
    sim.handle(Input::DragStart(Joint::Backrest)).unwrap();
    assert_eq!(sim.driver().dragging(), Some(Joint::Backrest));
    for tick in 1..10 {
        assert!(!sim.tick(tick as f64 * 20.).unwrap());
    }
    assert_eq!(*sim.angles(), seeked);
}

#[test]
fn sim_animation_limit_change() {
    let mut sim = Sim::new();
    sim.handle(Input::Animate([Some(30.5), None, None])).unwrap();
    sim.handle(Input::Limit(Joint::Middle, 5., 20.)).unwrap();
    assert_eq!(sim.angles().a1, 20.);
    sim.tick(0.).unwrap();
    assert!(sim.driver().is_idle());
    assert_eq!(sim.angles().a1, 20.);
}

#[test]
fn sim_drag() {
    let mut sim = Sim::new();
    let middle_end = sim.geometry().middle_end(sim.angles());
    assert_eq!(sim.hover(middle_end.pla(80., 0.)), Some(Joint::SeatPan));
    let cursor = middle_end.pla(100., -20.);
    assert!(!sim.handle(Input::DragTo(cursor)).unwrap());
    sim.handle(Input::DragStart(Joint::SeatPan)).unwrap();
    assert!(sim.handle(Input::DragTo(cursor)).unwrap());
    assert_eq!(sim.angles().a2, 50.);
    assert!(!sim.tick(0.).unwrap());
}

#[test]
fn sim_limits() {
    let mut sim = Sim::new();
    sim.handle(Input::Limit(Joint::Middle, 5., 20.)).unwrap();
    assert_eq!(sim.angles().a1, 20.);
    assert_eq!(sim.at_limit(), [true, false, false]);
    let err = sim.handle(Input::Limit(Joint::Middle, 50., 10.)).unwrap_err();
    assert!(matches!(err, SimError::Limit(_)));
    assert_eq!(sim.rules().limits[Joint::Middle], Limit { min: 5., max: 20. });
}

#[test]
fn sim_binding() {
    let mut sim = Sim::new();
    let bind = |s: &str| Input::Formula(Joint::Backrest, Some(s.to_string()));
    sim.handle(bind("angle1 + 10.2")).unwrap();
    assert_eq!(sim.angles().a3, 40.);
    sim.handle(Input::Press(Button::up(Actuator::Act1))).unwrap();
    for tick in 0..3 {
        sim.tick(tick as f64 * 20.).unwrap();
    }
    assert_abs_diff_eq!(sim.angles().a1, 30.4, epsilon = 1e-9);
    assert_eq!(sim.angles().a3, 40.5);
    // A parse error keeps the previous binding
    assert!(sim.handle(bind("angle1 +")).is_err());
    assert!(sim.binding().is_some());
    // A failed evaluation disables it
    let err = sim.handle(bind("1 / 0")).unwrap_err();
    assert_eq!(err, SimError::Formula(FormulaError::NonFinite));
    assert!(sim.binding().is_none());
}

#[test]
fn sim_reset() {
    let mut sim = Sim::new();
    sim.handle(Input::Ratio(1.5)).unwrap();
    sim.handle(Input::Save(2)).unwrap();
    sim.handle(Input::Press(Button::up(Actuator::Act3))).unwrap();
    for tick in 0..6 {
        sim.tick(tick as f64 * 50.).unwrap();
    }
    assert_eq!(sim.presets().get(2).unwrap().angles, [30., 30., 30.]);
    assert!(sim.samples().len() > 0);
    sim.handle(Input::Reset).unwrap();
    assert_eq!(*sim.angles(), Angles::default());
    assert_eq!(sim.rules().limits, Limits::wheelchair());
    assert_eq!(sim.rules().ratio, DEFAULT_RATIO);
    assert_eq!(*sim.presets(), Presets::default());
    assert!(sim.driver().is_idle());
    assert_eq!(sim.samples().len(), 0);
    let view = View { oscilloscope: true, graph12: false, ..View::default() };
    let mut sim = Sim::with_settings(Settings { view, ..Settings::default() });
    assert_eq!(sim.settings().view, view);
    sim.handle(Input::Reset).unwrap();
    assert_eq!(sim.settings().view, View::default());
}

#[test]
fn settings_defaults() {
    let s = Settings::default();
    assert_eq!(s.limits[Joint::Middle], Limit::FULL);
    assert_eq!(s.ratio, 0.8);
    assert!(s.allow_partial);
    assert!(s.view.graph12 && !s.view.oscilloscope);
    assert_eq!(s.presets.get(1).unwrap().angles, [35., 10., 50.]);
    let s = Settings::reset();
    assert_eq!(s.limits, Limits::wheelchair());
    let sim = Sim::with_settings(Settings { ratio: 9., ..s });
    assert_eq!(sim.rules().ratio, 2.);
    assert_eq!(sim.settings().limits, Limits::wheelchair());
    let mut preset = Preset::new([1., 2., 3.]);
    preset.enabled[1] = false;
    assert_eq!(preset.targets(), [Some(1.), None, Some(3.)]);
}

#[cfg(feature = "serde")]
#[test]
fn settings_ron() {
    let s = ron::from_str::<Settings>("(ratio: 1.2, view: (oscilloscope: true))").unwrap();
    assert_eq!(s.ratio, 1.2);
    assert!(s.view.graph12 && s.view.oscilloscope);
    assert_eq!(s.presets, Presets::default());
    let s = Settings::reset();
    let back = ron::from_str::<Settings>(&ron::to_string(&s).unwrap()).unwrap();
    assert_eq!(back, s);
    let inputs = ron::from_str::<Vec<Input>>(
        "[Press((act: z1, dir: up)), Joystick(0.5, -1.0), Limit(angle1, 5.0, 40.0), \
         Formula(backrest, Some(\"angle1 * 2\"))]",
    )
    .unwrap();
    assert_eq!(inputs[0], Input::Press(Button::up(Actuator::Z1)));
    assert_eq!(inputs[2], Input::Limit(Joint::Middle, 5., 40.));
}

#[cfg(feature = "csv")]
#[test]
fn samples_csv() {
    #[derive(serde::Deserialize)]
    struct Row {
        time: f64,
        angle1: f64,
        label: Option<String>,
    }
    let mut sim = Sim::new();
    sim.handle(Input::Press(Button::down(Actuator::Act1))).unwrap();
    for tick in 0..4 {
        sim.tick(tick as f64 * 50.).unwrap();
    }
    sim.handle(Input::Release).unwrap();
    sim.tick(200.).unwrap();
    let s = crate::csv::dump_csv(sim.samples()).unwrap();
    let rows = ::csv::Reader::from_reader(s.as_bytes())
        .deserialize()
        .collect::<Result<Vec<Row>, _>>()
        .unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].time, 0.);
    assert_eq!(rows[0].angle1, 30.);
    assert_eq!(rows[0].label.as_deref(), Some("act1-down"));
    assert_eq!(rows[4].label, None);
}
