//! Leaf command definitions.
//!
//! Each function pairs the argument definition of one leaf with the handler
//! that turns parsed arguments into a shell invocation.

use clap::{Arg, ArgAction, ArgMatches, Command};

use super::leaf::Handler;
use crate::core::Executor;

const VERSION_TEMPLATE: &str = "SONiC Software Version: SONiC.{{ build_version }}\n\
                                Distribution: Debian {{ debian_version }}\n\
                                Kernel: {{ kernel_version }}\n\
                                Build commit: {{ commit_id }}\n\
                                Build date: {{ build_date }}\n\
                                Built by: {{ built_by }}";

const PLATFORM_TEMPLATE: &str = "Platform: {{ platform }}\n\
                                 HwSKU: {{ minigraph_hwsku }}\n\
                                 ASIC: {{ asic_type }}";

const DOCKER_IMAGES: &str =
    r#"sudo docker images --format "table {{.Repository}}\t{{.Tag}}\t{{.ID}}\t{{.Size}}""#;

/// A leaf definition: arguments plus handler.
pub type Leaf = (Command, Handler);

fn value<'a>(matches: &'a ArgMatches, id: &str) -> Option<&'a str> {
    matches.get_one::<String>(id).map(String::as_str)
}

/// `base`, or `base <arg>` when the optional positional was given.
fn with_optional(base: &str, arg: Option<&str>) -> String {
    match arg {
        Some(arg) => format!("{base} {arg}"),
        None => base.to_string(),
    }
}

fn fixed(name: &'static str, about: &'static str) -> Command {
    Command::new(name).about(about)
}

fn with_positional(name: &'static str, about: &'static str, positional: &'static str) -> Command {
    Command::new(name).about(about).arg(Arg::new(positional).required(false))
}

// interfaces

pub fn interfaces_summary() -> Leaf {
    (
        with_positional("summary", "Show interface status and information", "interfacename"),
        |m, ex| ex.run(&with_optional("/sbin/ifconfig", value(m, "interfacename"))),
    )
}

pub fn interfaces_counters() -> Leaf {
    let cli = Command::new("counters")
        .about("Show interface counters")
        .arg(Arg::new("period").short('p').long("period"))
        .arg(Arg::new("printall").short('a').long("printall").action(ArgAction::SetTrue))
        .arg(Arg::new("clear").short('c').long("clear").action(ArgAction::SetTrue));
    (cli, |m, ex| ex.run(&counters_command(m)))
}

fn counters_command(matches: &ArgMatches) -> String {
    let mut cmd = String::from("portstat");
    if matches.get_flag("clear") {
        cmd.push_str(" -c");
    } else {
        if matches.get_flag("printall") {
            cmd.push_str(" -a");
        }
        if let Some(period) = value(matches, "period") {
            cmd.push_str(&format!(" -p {period}"));
        }
    }
    cmd
}

pub fn interfaces_portchannel() -> Leaf {
    (fixed("portchannel", "Show PortChannel information"), |_, ex| ex.run("teamshow"))
}

pub fn interfaces_sfp() -> Leaf {
    (with_positional("sfp", "Show SFP Transceiver information", "interfacename"), |m, ex| {
        let mut cmd = String::from("sudo sfputil show eeprom");
        if let Some(name) = value(m, "interfacename") {
            cmd.push_str(&format!(" -p {name}"));
        }
        ex.run(&cmd)
    })
}

// lldp

pub fn lldp_neighbors() -> Leaf {
    (with_positional("neighbors", "Show LLDP neighbors", "interfacename"), |m, ex| {
        ex.run(&with_optional("sudo lldpctl", value(m, "interfacename")))
    })
}

pub fn lldp_table() -> Leaf {
    (fixed("table", "Show LLDP neighbors in tabular format"), |_, ex| ex.run("sudo lldpshow"))
}

// bgp

pub fn bgp_neighbor() -> Leaf {
    (with_positional("neighbor", "Show BGP neighbors", "ipaddress"), |m, ex| match value(m, "ipaddress") {
        Some(ip) => ex.run(&format!("sudo vtysh -c \"show ip bgp neighbor {ip}\"")),
        None => ex.run("sudo vtysh -c \"show ip bgp neighbor\""),
    })
}

pub fn bgp_summary() -> Leaf {
    (fixed("summary", "Show summarized information of BGP state"), |_, ex| {
        ex.run("sudo vtysh -c \"show ip bgp summary\"")
    })
}

// platform

pub fn platform_summary() -> Leaf {
    (fixed("summary", "Show hardware platform information"), |_, ex| {
        ex.run_with_template("cli_platform_", PLATFORM_TEMPLATE, |path| {
            format!(
                "sonic-cfggen -m /etc/sonic/minigraph.xml -y /etc/sonic/sonic_version.yml -t {}",
                path.display()
            )
        })
    })
}

pub fn platform_syseeprom() -> Leaf {
    (fixed("syseeprom", "Show system EEPROM information"), |_, ex| ex.run("sudo decode-syseeprom"))
}

// top-level leaves

pub fn logging() -> Leaf {
    let cli = Command::new("logging")
        .about("Show system log")
        .arg(Arg::new("process").required(false))
        .arg(Arg::new("lines").short('l').long("lines"))
        .arg(Arg::new("follow").short('f').long("follow").action(ArgAction::SetTrue));
    (cli, |m, ex| ex.run(&logging_command(m)))
}

fn logging_command(matches: &ArgMatches) -> String {
    if matches.get_flag("follow") {
        return "sudo tail -f /var/log/syslog".to_string();
    }

    let mut cmd = String::from("sudo cat /var/log/syslog");
    if let Some(process) = value(matches, "process") {
        cmd.push_str(&format!(" | grep '{process}'"));
    }
    if let Some(lines) = value(matches, "lines") {
        cmd.push_str(&format!(" | tail -{lines}"));
    }
    cmd
}

pub fn version() -> Leaf {
    (fixed("version", "Show version information"), show_version)
}

fn show_version(_: &ArgMatches, executor: &Executor) -> anyhow::Result<i32> {
    let code = executor.run_with_template("cli_version_", VERSION_TEMPLATE, |path| {
        format!("sonic-cfggen -y /etc/sonic/sonic_version.yml -t {}", path.display())
    })?;

    if let Some(closed) = executor.print_line("Docker images:")? {
        return Ok(closed);
    }
    let docker = executor.run_quiet(DOCKER_IMAGES)?;

    Ok(if code == 0 { docker } else { code })
}

pub fn environment() -> Leaf {
    (fixed("environment", "Show environmentals (voltages, fans, temps)"), |_, ex| ex.run("sudo sensors"))
}

pub fn processes_cpu() -> Leaf {
    // Batch mode keeps top from redrawing the screen.
    (fixed("cpu", "Show processes CPU info"), |_, ex| ex.run("top -bn 1"))
}

pub fn users() -> Leaf {
    (fixed("users", "Show users"), |_, ex| ex.run("who"))
}

pub fn techsupport() -> Leaf {
    (fixed("techsupport", "Gather information for troubleshooting"), |_, ex| {
        ex.run("sudo generate_dump -v")
    })
}

// runningconfiguration / startupconfiguration

pub fn running_bgp() -> Leaf {
    (fixed("bgp", "Show BGP running configuration"), |_, ex| {
        ex.run("sudo vtysh -c \"show running-config\"")
    })
}

pub fn running_interfaces() -> Leaf {
    (with_positional("interfaces", "Show interfaces running configuration", "interfacename"), |m, ex| {
        match value(m, "interfacename") {
            Some(name) => ex.run(&format!("cat /etc/network/interfaces | grep {name} -A 4")),
            None => ex.run("cat /etc/network/interfaces"),
        }
    })
}

pub fn running_snmp() -> Leaf {
    (fixed("snmp", "Show SNMP running configuration"), |_, ex| {
        ex.run("sudo docker exec -it snmp cat /etc/snmp/snmpd.conf")
    })
}

pub fn running_ntp() -> Leaf {
    (fixed("ntp", "Show NTP running configuration"), |_, ex| ex.run("cat /etc/ntp.conf"))
}

pub fn startup_bgp() -> Leaf {
    (fixed("bgp", "Show BGP startup configuration"), |_, ex| {
        ex.run("sudo docker exec -it bgp cat /etc/quagga/bgpd.conf")
    })
}

// shared with `ip`

pub fn arp() -> Leaf {
    (with_positional("arp", "Show IP ARP table", "ipaddress"), |m, ex| {
        ex.run(&with_optional("/usr/sbin/arp -n", value(m, "ipaddress")))
    })
}

pub fn route() -> Leaf {
    (with_positional("route", "Show ip routing table", "ipaddress"), |m, ex| match value(m, "ipaddress") {
        Some(ip) => ex.run(&format!("sudo vtysh -c \"show ip route {ip}\"")),
        None => ex.run("sudo vtysh -c \"show ip route\""),
    })
}

pub fn ntp() -> Leaf {
    (fixed("ntp", "Show NTP information"), |_, ex| ex.run("ntpq -p"))
}

pub fn uptime() -> Leaf {
    (fixed("uptime", "Show system uptime"), |_, ex| ex.run("uptime -p"))
}
