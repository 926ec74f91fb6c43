//! Tests for the mutex-shared client

use std::thread;

use sysmon::protocol::{decode_alert, OpCode};
use sysmon::SharedClient;

use crate::mock::{alert, connected, recv, send_matches, send_record};

const THREADS: u64 = 4;
const PER_THREAD: u64 = 5;

#[test]
fn test_concurrent_submits_stay_framed() {
    let (client, daemon) = connected(|mut daemon| {
        let mut ids = Vec::new();
        for _ in 0..THREADS * PER_THREAD {
            let packet = recv(&mut daemon).unwrap();
            assert_eq!(packet.opcode, OpCode::AlertInsert);
            ids.push(decode_alert(packet.payload.unwrap()).unwrap().id());
        }
        ids
    });

    let shared = SharedClient::new(client);
    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    shared.submit_alert(&alert(t * 100 + i)).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let mut ids = daemon.join().unwrap();
    ids.sort_unstable();
    let mut expected: Vec<u64> = (0..THREADS)
        .flat_map(|t| (0..PER_THREAD).map(move |i| t * 100 + i))
        .collect();
    expected.sort_unstable();
    assert_eq!(ids, expected);
}

#[test]
fn test_shared_query_and_batch() {
    let (client, daemon) = connected(|mut daemon| {
        for _ in 0..2 {
            recv(&mut daemon).unwrap();
            send_matches(&mut daemon, 1);
            send_record(&mut daemon, &alert(7));
        }
        recv(&mut daemon).unwrap().opcode
    });

    let shared = SharedClient::new(client);
    let alerts = shared.query_alerts("ORDER BY stamp").unwrap();
    assert_eq!(alerts, vec![alert(7)]);

    let marked = shared.with(|client| {
        let alerts = client.all_alerts()?;
        for alert in &alerts {
            client.mark_as_read(alert.id())?;
        }
        Ok::<_, sysmon::SysmonError>(alerts.len())
    });
    assert_eq!(marked.unwrap(), 1);

    assert_eq!(daemon.join().unwrap(), OpCode::AlertMarkAsRead);
    assert_eq!(shared.type_name_for_id(1), None);
    assert_eq!(shared.type_id_for_name("X"), None);
}
