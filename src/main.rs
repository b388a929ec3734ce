use std::thread::sleep;
use std::time::Duration;

use clap::Parser;
use rosc::OscType;

use oscport::{OscPort, PortConfig, ReceiveMode};

/// Listen for OSC messages and log RGB floats arriving on /color.
#[derive(Parser)]
struct Args {
    /// Local UDP port to listen on
    #[arg(long, default_value_t = 10000)]
    port: u16,
    /// Default remote host for outbound sends
    #[arg(long, default_value = "localhost")]
    remote_host: String,
    /// Default remote port for outbound sends
    #[arg(long, default_value_t = 3000)]
    remote_port: u16,
    /// Receive buffer limit; 0 or below means unlimited
    #[arg(long, default_value_t = 10)]
    limit: i32,
}

fn main() {
    let args = Args::parse();

    let mut port = OscPort::udp(PortConfig {
        receive_mode: ReceiveMode::Event,
        local_port: args.port,
        default_remote_host: args.remote_host,
        default_remote_port: args.remote_port,
        limit_receive_buffer: args.limit,
    });

    port.on_receive_path("/color", |msg| {
        let mut floats = msg.args.iter().filter_map(|arg| match arg {
            OscType::Float(f) => Some(*f),
            _ => None,
        });
        match (floats.next(), floats.next(), floats.next()) {
            (Some(r), Some(g), Some(b)) => println!("color {} {} {}", r, g, b),
            _ => println!("color message with unexpected args: {:?}", msg.args),
        }
        Ok(())
    });
    port.on_error(|err| eprintln!("receive error: {}", err));

    if let Err(err) = port.activate() {
        eprintln!("failed to activate port: {}", err);
        std::process::exit(1);
    }
    println!("listening for OSC on port {}", args.port);

    // Tick dispatch at roughly frame rate until the receive loop dies.
    while port.is_active() {
        port.update();
        sleep(Duration::from_millis(16));
    }
    eprintln!("receive loop terminated");
    port.deactivate();
}
