/// Discovery listener behavior against scripted capture sources.
mod common;

use common::{FakeCapture, neighbor_frame};
use lldpd::signal::cancel_pair;
use lldpd::transport::{CapturedPacket, LinkType};
use lldpd::{DiscoveryListener, DiscoveryResult, EthernetFrame, LldpEncode, MacAddr};
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

fn ipv4_packet() -> CapturedPacket {
    let frame = EthernetFrame {
        destination: MacAddr([0xff; 6]),
        source: MacAddr([0x02, 0, 0, 0, 0, 0x09]),
        ether_type: 0x0800,
        vlan_id: None,
        payload: vec![0x45, 0x00, 0x00, 0x14],
    };
    CapturedPacket::ethernet(frame.to_bytes().unwrap())
}

#[tokio::test]
async fn test_only_lldp_frames_are_reported() {
    let capture = FakeCapture::new(vec![
        Some(neighbor_frame("leaf01", "Cumulus Linux")),
        Some(ipv4_packet()),
        Some(neighbor_frame("leaf02", "SONiC")),
    ]);
    let capture_log = capture.log.clone();
    let (tx, mut rx) = mpsc::channel(4);
    let (cancel, signal) = cancel_pair();
    let task = DiscoveryListener::new("lan0", capture).start(tx, signal);

    assert_eq!(rx.recv().await, Some(DiscoveryResult::new("leaf01", "Cumulus Linux")));
    assert_eq!(rx.recv().await, Some(DiscoveryResult::new("leaf02", "SONiC")));

    cancel.send(true).unwrap();
    task.await.unwrap().unwrap();
    assert_eq!(rx.recv().await, None);
    assert!(capture_log.closed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_undecodable_packets_are_skipped() {
    let mut truncated = neighbor_frame("leaf01", "Cumulus Linux");
    truncated.data.truncate(20);
    let mut infiniband = neighbor_frame("leaf01", "Cumulus Linux");
    infiniband.link_type = LinkType::Other(32);

    let capture = FakeCapture::new(vec![
        Some(truncated),
        Some(infiniband),
        Some(CapturedPacket::ethernet(vec![0x01, 0x80])),
        Some(neighbor_frame("leaf03", "")),
    ]);
    let (tx, mut rx) = mpsc::channel(4);
    let (cancel, signal) = cancel_pair();
    let task = DiscoveryListener::new("lan0", capture).start(tx, signal);

    assert_eq!(rx.recv().await, Some(DiscoveryResult::new("leaf03", "")));

    drop(cancel);
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_ended_capture_is_reopened() {
    let capture = FakeCapture::new(vec![
        Some(neighbor_frame("leaf01", "before")),
        None,
        Some(neighbor_frame("leaf01", "after")),
    ]);
    let capture_log = capture.log.clone();
    let (tx, mut rx) = mpsc::channel(4);
    let (cancel, signal) = cancel_pair();
    let task = DiscoveryListener::new("lan0", capture)
        .with_reopen_policy(Duration::from_millis(100), 3)
        .start(tx, signal);

    assert_eq!(rx.recv().await.unwrap().sys_description, "before");
    assert_eq!(rx.recv().await.unwrap().sys_description, "after");
    assert_eq!(capture_log.reopened.load(Ordering::SeqCst), 1);

    cancel.send(true).unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_listener_gives_up_after_failed_reopens() {
    let capture = FakeCapture::failing_reopen(vec![None]);
    let capture_log = capture.log.clone();
    let (tx, mut rx) = mpsc::channel(4);
    let (_cancel, signal) = cancel_pair();
    let task = DiscoveryListener::new("lan0", capture)
        .with_reopen_policy(Duration::from_millis(100), 3)
        .start(tx, signal);

    assert!(task.await.unwrap().is_err());
    assert_eq!(capture_log.reopened.load(Ordering::SeqCst), 3);
    assert!(capture_log.closed.load(Ordering::SeqCst));
    assert_eq!(rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_while_waiting_to_reopen() {
    let capture = FakeCapture::failing_reopen(vec![None]);
    let capture_log = capture.log.clone();
    let (tx, mut rx) = mpsc::channel(4);
    let (cancel, signal) = cancel_pair();
    let task = DiscoveryListener::new("lan0", capture)
        .with_reopen_policy(Duration::from_secs(30), 5)
        .start(tx, signal);

    time::sleep(Duration::from_secs(45)).await;
    cancel.send(true).unwrap();

    task.await.unwrap().unwrap();
    assert_eq!(capture_log.reopened.load(Ordering::SeqCst), 1);
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn test_listener_stops_when_consumer_is_gone() {
    let capture = FakeCapture::new(vec![Some(neighbor_frame("leaf01", "Cumulus Linux"))]);
    let capture_log = capture.log.clone();
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let (_cancel, signal) = cancel_pair();

    DiscoveryListener::new("lan0", capture).start(tx, signal).await.unwrap().unwrap();
    assert!(capture_log.closed.load(Ordering::SeqCst));
}
