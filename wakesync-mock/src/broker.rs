use std::error::Error;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::thread;

use rumqttd::local::LinkTx;
use rumqttd::{Broker, Config, Notification};

use crate::settings::Broker as BrokerSettings;

pub struct MockBroker {
    pub broker: Arc<Mutex<Broker>>,
}

impl MockBroker {
    pub fn new(settings: &BrokerSettings) -> Result<Self, Box<dyn Error>> {
        let listen: SocketAddr = (settings.host.parse::<IpAddr>()?, settings.port).into();

        // Fields left out of the document take rumqttd's defaults.
        let raw = format!(
            r#"
id = 0

[router]
max_connections = 10010
max_outgoing_packet_count = 200
max_segment_size = 104857600
max_segment_count = 10

[v4.1]
name = "v4-1"
listen = "{listen}"
next_connection_delay_ms = 10

[v4.1.connections]
connection_timeout_ms = 60000
max_payload_size = 20480
max_inflight_count = 100
dynamic_filters = true
"#
        );

        let broker_config: Config = config::Config::builder()
            .add_source(config::File::from_str(&raw, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            broker: Arc::new(Mutex::new(Broker::new(broker_config))),
        })
    }

    pub fn start(&self) {
        let broker = Arc::clone(&self.broker);

        thread::spawn(move || broker.lock().unwrap().start().unwrap());
    }

    /// Links a local client subscribed to `topic` and logs everything the
    /// broker forwards to it.
    pub fn link(&self, topic: &str) -> LinkTx {
        let (mut link_tx, mut link_rx) = {
            let broker = self.broker.lock().unwrap();
            broker.link("wakesync-mock").unwrap()
        };

        link_tx.subscribe(topic).unwrap();

        thread::spawn(move || {
            let mut count = 0;
            loop {
                let notification = match link_rx.recv().unwrap() {
                    Some(notification) => notification,
                    None => continue,
                };

                match notification {
                    Notification::Forward(forward) => {
                        count += 1;
                        println!(
                            "Topic = {:?}, Count = {}, Payload = {} bytes",
                            forward.publish.topic,
                            count,
                            forward.publish.payload.len()
                        );
                    }
                    other => println!("{other:?}"),
                }
            }
        });

        link_tx
    }
}
