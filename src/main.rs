use robdd_reach::reachability::ReachabilityAnalyzer;

fn inverting_latch() -> ReachabilityAnalyzer {
    let mut an = ReachabilityAnalyzer::new(2, 0).unwrap();
    let s = an.get_states().to_vec();
    let not_s0 = an.manager_mut().neg(s[0]);
    let not_s1 = an.manager_mut().neg(s[1]);
    an.set_transition_functions(vec![not_s0, not_s1]).unwrap();
    an
}

fn shift_register() -> ReachabilityAnalyzer {
    let mut an = ReachabilityAnalyzer::new(2, 0).unwrap();
    let s = an.get_states().to_vec();
    let delta0 = an.manager_mut().neg(s[1]);
    let delta1 = s[0];
    an.set_transition_functions(vec![delta0, delta1]).unwrap();
    an
}

fn input_gated() -> ReachabilityAnalyzer {
    let mut an = ReachabilityAnalyzer::new(1, 1).unwrap();
    let s = an.get_states().to_vec();
    let x = an.get_inputs().to_vec();
    let not_s0 = an.manager_mut().neg(s[0]);
    let delta0 = an.manager_mut().and2(not_s0, x[0]);
    an.set_transition_functions(vec![delta0]).unwrap();
    an
}

fn run(name: &str, mut an: ReachabilityAnalyzer) {
    let k = an.get_states().len();
    let reachable = an.compute_reachable_states();
    println!("{name}: reachable-set id = {:?}", reachable);
    for bits in 0u32..(1 << k) {
        let v: Vec<bool> = (0..k).map(|i| (bits >> i) & 1 == 1).collect();
        let reached = an.is_reachable(&v).unwrap();
        let distance = an.state_distance(&v).unwrap();
        println!("  state {:?}: reachable={reached}, distance={distance}", v);
    }
}

fn main() {
    env_logger::init();

    let scenario = std::env::args().nth(1).unwrap_or_else(|| "latch".to_string());
    match scenario.as_str() {
        "latch" => run("inverting latch", inverting_latch()),
        "shift" => run("shift register", shift_register()),
        "input" => run("input-gated toggle", input_gated()),
        other => {
            eprintln!("unknown scenario '{other}', expected one of: latch, shift, input");
            std::process::exit(1);
        }
    }
}
