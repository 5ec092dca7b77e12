//! Dispatch integration tests.
//!
//! Builds small command trees with recording actions and drives them
//! through the public routing API.

use std::sync::{Arc, Mutex};

use sonic_show::core::{
    AliasTable, DispatchError, Dispatcher, Invocation, MatchPolicy, NodeId, Registry, Resolution,
    Resolver, Route, EXIT_SUCCESS, EXIT_USAGE,
};

type Calls = Arc<Mutex<Vec<(String, Vec<String>)>>>;

/// An action that records its command path and arguments, then returns `code`.
fn recorder(calls: &Calls, code: i32) -> impl Fn(&Invocation<'_>) -> anyhow::Result<i32> {
    let calls = Arc::clone(calls);
    move |inv: &Invocation<'_>| {
        calls.lock().unwrap().push((inv.command_line(), inv.args.to_vec()));
        Ok(code)
    }
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

fn dispatch(registry: &Registry, aliases: &AliasTable, argv: &[&str]) -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = Dispatcher::new(registry, aliases).dispatch_to(&args(argv), &mut out, &mut err);
    (code, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_nested_group_then_command() {
    let calls = Calls::default();
    let mut registry = Registry::new("show", "");
    let root = registry.root();
    let ip = registry.register_group(root, "ip", "Show IP commands").unwrap();
    registry.register_command(ip, "route", "Show ip routing table", recorder(&calls, 0)).unwrap();

    let (code, _, _) = dispatch(&registry, &AliasTable::new(), &["ip", "route"]);

    assert_eq!(code, EXIT_SUCCESS);
    assert_eq!(*calls.lock().unwrap(), vec![("show ip route".to_string(), Vec::new())]);
}

#[test]
fn test_alias_resolves_before_default() {
    let calls = Calls::default();
    let mut registry = Registry::new("show", "");
    let root = registry.root();
    registry.register_command(root, "status", "", recorder(&calls, 0)).unwrap();
    registry.register_command(root, "fallback", "", recorder(&calls, 0)).unwrap();
    registry.set_default(root, "fallback", false).unwrap();
    let aliases: AliasTable = [("st", "status")].into_iter().collect();

    let (code, _, _) = dispatch(&registry, &aliases, &["st"]);

    assert_eq!(code, EXIT_SUCCESS);
    assert_eq!(*calls.lock().unwrap(), vec![("show status".to_string(), Vec::new())]);
}

#[test]
fn test_unique_prefix() {
    let calls = Calls::default();
    let mut registry = Registry::new("show", "");
    let root = registry.root();
    registry.register_command(root, "interfaces", "", recorder(&calls, 0)).unwrap();
    registry.register_command(root, "ip", "", recorder(&calls, 0)).unwrap();

    dispatch(&registry, &AliasTable::new(), &["int", "Ethernet0"]);

    assert_eq!(
        *calls.lock().unwrap(),
        vec![("show interfaces".to_string(), args(&["Ethernet0"]))]
    );
}

#[test]
fn test_ambiguous_prefix_fails_whole_dispatch() {
    let calls = Calls::default();
    let mut registry = Registry::new("show", "");
    let root = registry.root();
    registry.register_command(root, "neighbor", "", recorder(&calls, 0)).unwrap();
    registry.register_command(root, "neighbors", "", recorder(&calls, 0)).unwrap();
    registry.register_command(root, "default", "", recorder(&calls, 0)).unwrap();
    registry.set_default(root, "default", true).unwrap();

    let (code, out, err) = dispatch(&registry, &AliasTable::new(), &["neighb"]);

    assert_eq!(code, EXIT_USAGE);
    assert!(out.is_empty());
    assert_eq!(
        err,
        "Usage: show [OPTIONS] COMMAND [ARGS]...\n\
         Try \"show -h\" for help.\n\
         \n\
         Error: Too many matches: neighbor, neighbors\n"
    );
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_default_gets_token_prepended() {
    let calls = Calls::default();
    let mut registry = Registry::new("show", "");
    let root = registry.root();
    let lldp = registry.register_group(root, "lldp", "").unwrap();
    registry.register_command(lldp, "neighbors", "", recorder(&calls, 0)).unwrap();
    registry.register_command(lldp, "table", "", recorder(&calls, 0)).unwrap();
    registry.set_default(lldp, "neighbors", false).unwrap();

    dispatch(&registry, &AliasTable::new(), &["lldp", "xyz", "--detail", "xyz"]);

    assert_eq!(
        *calls.lock().unwrap(),
        vec![("show lldp neighbors".to_string(), args(&["xyz", "--detail", "xyz"]))]
    );
}

#[test]
fn test_default_group_keeps_token_pending() {
    let calls = Calls::default();
    let mut registry = Registry::new("show", "");
    let root = registry.root();
    let outer = registry.register_group(root, "outer", "").unwrap();
    let inner = registry.register_group(outer, "inner", "").unwrap();
    registry.register_command(inner, "leaf", "", recorder(&calls, 0)).unwrap();
    registry.set_default(outer, "inner", false).unwrap();

    // `lea` is not a child of `outer`, falls to `inner`, where it abbreviates `leaf`.
    dispatch(&registry, &AliasTable::new(), &["outer", "lea", "x"]);

    assert_eq!(
        *calls.lock().unwrap(),
        vec![("show outer inner leaf".to_string(), args(&["x"]))]
    );
}

#[test]
fn test_no_args_without_default_shows_help() {
    let mut registry = Registry::new("show", "Top");
    let root = registry.root();
    let platform = registry.register_group(root, "platform", "Show platform info").unwrap();
    registry
        .register_command(platform, "syseeprom", "Show EEPROM", |_: &Invocation<'_>| -> anyhow::Result<i32> {
            Ok(9)
        })
        .unwrap();

    let (code, out, err) = dispatch(&registry, &AliasTable::new(), &["plat"]);

    assert_eq!(code, EXIT_SUCCESS);
    assert!(err.is_empty());
    assert!(out.starts_with("Usage: show platform [OPTIONS] COMMAND [ARGS]...\n"));
    assert!(out.contains("  syseeprom  Show EEPROM\n"));
}

#[test]
fn test_action_exit_code_is_verbatim() {
    let calls = Calls::default();
    let mut registry = Registry::new("show", "");
    let root = registry.root();
    registry.register_command(root, "techsupport", "", recorder(&calls, 42)).unwrap();

    let (code, _, _) = dispatch(&registry, &AliasTable::new(), &["tech"]);
    assert_eq!(code, 42);
}

// ============================================================================
// Properties
// ============================================================================

fn wide_tree(calls: &Calls) -> (Registry, NodeId, NodeId) {
    let mut registry = Registry::new("show", "");
    let root = registry.root();
    let ip = registry.register_group(root, "ip", "").unwrap();
    let bgp = registry.new_group("bgp", "").unwrap();
    registry.attach(root, "bgp", bgp).unwrap();
    registry.attach(ip, "bgp", bgp).unwrap();
    for name in ["neighbor", "neighbors", "summary", "network"] {
        registry.register_command(bgp, name, "", recorder(calls, 0)).unwrap();
    }
    registry.register_command(root, "uptime", "", recorder(calls, 0)).unwrap();
    registry.register_command(root, "users", "", recorder(calls, 0)).unwrap();
    (registry, ip, bgp)
}

#[test]
fn test_exact_name_always_wins() {
    let calls = Calls::default();
    let (registry, _, bgp) = wide_tree(&calls);
    // Aliases that try to hijack real names are ignored.
    let aliases: AliasTable =
        [("summary", "network"), ("neighbor", "summary")].into_iter().collect();
    let resolver = Resolver::new(&registry, &aliases);

    let group = registry.group(bgp).unwrap();
    for (name, id) in group.children() {
        assert_eq!(resolver.resolve(bgp, name), Resolution::Found(*id));
    }
}

#[test]
fn test_alias_equivalent_to_target() {
    let calls = Calls::default();
    let (registry, _, bgp) = wide_tree(&calls);
    let aliases: AliasTable = [("sum", "neighbors"), ("nets", "network")].into_iter().collect();
    let resolver = Resolver::new(&registry, &aliases);

    assert_eq!(resolver.resolve(bgp, "sum"), resolver.resolve(bgp, "neighbors"));
    assert_eq!(resolver.resolve(bgp, "nets"), resolver.resolve(bgp, "network"));
}

#[test]
fn test_shared_group_resolves_identically() {
    let calls = Calls::default();
    let (registry, ip, _) = wide_tree(&calls);
    let aliases = AliasTable::new();
    let dispatcher = Dispatcher::new(&registry, &aliases);

    for token in ["neighbor", "neighb", "sum", "net", "zzz"] {
        let via_root = dispatcher.route(&args(&["bgp", token]));
        let via_ip = dispatcher.route(&args(&["ip", "bgp", token]));
        match (via_root, via_ip) {
            (
                Ok(Route::Command { node: a, args: x, .. }),
                Ok(Route::Command { node: b, args: y, .. }),
            ) => {
                assert_eq!(a, b);
                assert_eq!(x, y);
            }
            (
                Err(DispatchError::Ambiguous { candidates: a, .. }),
                Err(DispatchError::Ambiguous { candidates: b, .. }),
            ) => assert_eq!(a, b),
            (
                Err(DispatchError::NoSuchCommand { name: a, .. }),
                Err(DispatchError::NoSuchCommand { name: b, .. }),
            ) => assert_eq!(a, b),
            other => panic!("paths disagree for {token}: {other:?}"),
        }
    }
    assert_eq!(
        dispatcher.route(&args(&["ip", "bgp", "neighb"])).unwrap_err(),
        DispatchError::Ambiguous {
            path: args(&["show", "ip", "bgp"]),
            candidates: args(&["neighbor", "neighbors"]),
        }
    );
    assert_eq!(registry.child(ip, "bgp"), registry.child(registry.root(), "bgp"));
}

#[test]
fn test_routing_is_repeatable() {
    let calls = Calls::default();
    let (registry, _, _) = wide_tree(&calls);
    let aliases: AliasTable = [("up", "uptime")].into_iter().collect();
    let dispatcher = Dispatcher::new(&registry, &aliases);

    let cases: [&[&str]; 5] = [&["up"], &["u"], &["bgp", "sum", "x"], &["ip"], &["nope"]];
    for argv in cases {
        assert_eq!(dispatcher.route(&args(argv)), dispatcher.route(&args(argv)));
    }
}

#[test]
fn test_exact_policy_group() {
    let calls = Calls::default();
    let (mut registry, ip, _) = wide_tree(&calls);
    registry.set_policy(ip, MatchPolicy::Exact).unwrap();
    let aliases: AliasTable = [("b", "bgp")].into_iter().collect();
    let dispatcher = Dispatcher::new(&registry, &aliases);

    assert!(dispatcher.route(&args(&["ip", "bgp", "sum"])).is_ok());
    assert!(matches!(
        dispatcher.route(&args(&["ip", "b", "sum"])),
        Err(DispatchError::NoSuchCommand { .. })
    ));
    // The root still applies aliases.
    assert!(dispatcher.route(&args(&["b", "sum"])).is_ok());
}
