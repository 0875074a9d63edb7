use super::Broker;
use super::handle::SubscriberHandle;
use super::message::Message;
use super::topic::Topic;
use crate::client::{Subscriber, subscriber_fn};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Recorder {
    received: Mutex<Vec<String>>,
}

impl Recorder {
    fn payloads(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

impl Subscriber for Recorder {
    fn receive_message(&self, message: &Message) {
        let payload = message.payload::<String>().cloned().unwrap_or_default();
        self.received.lock().unwrap().push(payload);
    }
}

fn recorder() -> (Arc<Recorder>, Arc<dyn Subscriber>) {
    let rec = Arc::new(Recorder::default());
    let sub: Arc<dyn Subscriber> = rec.clone();
    (rec, sub)
}

fn msg(topic: &str, payload: &str) -> Message {
    Message::new(topic, payload.to_string())
}

#[test]
fn test_topic_equality_across_instances() {
    let a = Topic::new("orders.created");
    let b = Topic::from(String::from("orders.created"));
    assert_eq!(a, b);

    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
    assert_ne!(b, Topic::from("orders.confirmed"));
}

#[test]
fn test_topic_serializes_as_string() {
    let topic = Topic::from("sensor_updates");
    let json = serde_json::to_string(&topic).unwrap();
    assert_eq!(json, "\"sensor_updates\"");
    let back: Topic = serde_json::from_str(&json).unwrap();
    assert_eq!(back, topic);
}

#[test]
fn test_message_payload_is_shared() {
    let m = msg("t", "hello");
    let copy = m.clone();
    assert!(Arc::ptr_eq(m.payload_any(), copy.payload_any()));
    assert_eq!(copy.payload::<String>().unwrap(), "hello");
    assert!(copy.payload::<i32>().is_none());
}

#[test]
fn test_handle_identity_follows_subscriber() {
    let (_rec, sub) = recorder();
    let (_other, other_sub) = recorder();

    assert_eq!(SubscriberHandle::of(&sub), SubscriberHandle::new(sub.clone()));
    assert_ne!(SubscriberHandle::of(&sub), SubscriberHandle::of(&other_sub));
}

#[test]
fn test_broker_new() {
    let broker = Broker::new();
    assert!(broker.topics().is_empty());
}

#[test]
fn test_broker_publish_delivers_once() {
    let broker = Broker::new();
    let (rec, sub) = recorder();
    broker.add_subscription(sub, Topic::from("test_topic"));

    let report = broker.publish_message_reliable(&msg("test_topic", "hello"));
    assert_eq!(report.delivered, 1);
    assert!(report.is_clean());
    assert_eq!(rec.payloads(), vec!["hello"]);
}

#[test]
fn test_publish_only_reaches_matching_topic() {
    let broker = Broker::new();
    let (rec_t, sub_t) = recorder();
    let (rec_u, sub_u) = recorder();
    broker.add_subscription(sub_t, Topic::from("T"));
    broker.add_subscription(sub_u, Topic::from("U"));

    broker.publish_message_reliable(&msg("T", "only-t"));
    assert_eq!(rec_t.payloads(), vec!["only-t"]);
    assert!(rec_u.payloads().is_empty());
}

#[test]
fn test_duplicate_subscribe_is_idempotent() {
    let broker = Broker::new();
    let (rec, sub) = recorder();
    broker.add_subscription(sub.clone(), Topic::from("T"));
    broker.add_subscription(sub, Topic::from("T"));
    assert_eq!(broker.subscriber_count(&Topic::from("T")), 1);

    broker.publish_message_reliable(&msg("T", "once"));
    assert_eq!(rec.payloads().len(), 1);
}

#[test]
fn test_broker_subscribe_and_unsubscribe() {
    let broker = Broker::new();
    let (rec, sub) = recorder();
    let topic = Topic::from("T");

    broker.add_subscription(sub.clone(), topic.clone());
    assert!(broker.is_subscribed(&sub, &topic));

    broker.remove_subscription(&sub, &topic);
    assert!(!broker.is_subscribed(&sub, &topic));

    broker.publish_message_reliable(&msg("T", "dropped"));
    assert!(rec.payloads().is_empty());
}

#[test]
fn test_unsubscribe_unknown_is_noop() {
    let broker = Broker::new();
    let (_rec, sub) = recorder();
    let (_other, other_sub) = recorder();
    broker.add_subscription(other_sub.clone(), Topic::from("T"));

    broker.remove_subscription(&sub, &Topic::from("T"));
    broker.remove_subscription(&sub, &Topic::from("missing"));
    broker.remove_subscriber(&sub);

    assert!(broker.is_subscribed(&other_sub, &Topic::from("T")));
}

#[test]
fn test_remove_subscriber_clears_every_topic() {
    let broker = Broker::new();
    let (rec, sub) = recorder();
    let (keep_rec, keep) = recorder();
    broker.add_subscription(sub.clone(), Topic::from("T1"));
    broker.add_subscription(sub.clone(), Topic::from("T2"));
    broker.add_subscription(keep, Topic::from("T2"));

    broker.remove_subscriber(&sub);

    broker.publish_message_reliable(&msg("T1", "a"));
    broker.publish_message_reliable(&msg("T2", "b"));
    assert!(rec.payloads().is_empty());
    assert_eq!(keep_rec.payloads(), vec!["b"]);
}

#[test]
fn test_empty_topics_are_pruned() {
    let broker = Broker::new();
    let (_rec, sub) = recorder();
    broker.add_subscription(sub.clone(), Topic::from("T1"));
    broker.add_subscription(sub.clone(), Topic::from("T2"));

    broker.remove_subscription(&sub, &Topic::from("T1"));
    assert_eq!(broker.topics(), vec![Topic::from("T2")]);

    broker.remove_subscriber(&sub);
    assert!(broker.topics().is_empty());
}

#[test]
fn test_fan_out_to_all_subscribers() {
    let broker = Broker::new();
    let (rec1, sub1) = recorder();
    let (rec2, sub2) = recorder();
    broker.add_subscription(sub1, Topic::from("T"));
    broker.add_subscription(sub2, Topic::from("T"));

    let report = broker.publish_message_reliable(&msg("T", "fan"));
    assert_eq!(report.delivered, 2);
    assert_eq!(rec1.payloads(), vec!["fan"]);
    assert_eq!(rec2.payloads(), vec!["fan"]);
}

#[test]
fn test_publish_to_nonexistent_topic() {
    let broker = Broker::new();
    let report = broker.publish_message_reliable(&msg("nonexistent_topic", "hello"));
    assert_eq!(report.total(), 0);
}

#[test]
fn test_panicking_subscriber_is_isolated() {
    let broker = Broker::new();
    let (rec1, sub1) = recorder();
    let (rec2, sub2) = recorder();
    broker.add_subscription(subscriber_fn(|_| panic!("boom")), Topic::from("T"));
    broker.add_subscription(sub1, Topic::from("T"));
    broker.add_subscription(sub2, Topic::from("T"));

    let report = broker.publish_message_reliable(&msg("T", "still-here"));
    assert_eq!(report.failed, 1);
    assert_eq!(report.delivered, 2);
    assert_eq!(rec1.payloads(), vec!["still-here"]);
    assert_eq!(rec2.payloads(), vec!["still-here"]);
}

#[test]
fn test_subscriber_can_unsubscribe_itself_during_delivery() {
    let broker = Arc::new(Broker::new());
    let slot: Arc<Mutex<Option<Arc<dyn Subscriber>>>> = Arc::new(Mutex::new(None));

    let inner_broker = broker.clone();
    let inner_slot = slot.clone();
    let sub = subscriber_fn(move |m| {
        if let Some(me) = inner_slot.lock().unwrap().take() {
            inner_broker.remove_subscription(&me, m.topic());
        }
    });
    *slot.lock().unwrap() = Some(sub.clone());
    broker.add_subscription(sub.clone(), Topic::from("T"));

    let report = broker.publish_message_reliable(&msg("T", "bye"));
    assert_eq!(report.delivered, 1);
    assert!(!broker.is_subscribed(&sub, &Topic::from("T")));
}

#[test]
fn test_publish_uses_snapshot_at_call_time() {
    let broker = Arc::new(Broker::new());
    let (late_rec, late) = recorder();

    // The first subscriber registers a second one mid-delivery; the second
    // must not see this publish, only later ones.
    let inner_broker = broker.clone();
    let late_sub = late.clone();
    let first = subscriber_fn(move |m| {
        inner_broker.add_subscription(late_sub.clone(), m.topic().clone());
    });
    broker.add_subscription(first, Topic::from("T"));

    broker.publish_message_reliable(&msg("T", "first"));
    assert!(late_rec.payloads().is_empty());

    broker.publish_message_reliable(&msg("T", "second"));
    assert_eq!(late_rec.payloads(), vec!["second"]);
}

#[test]
fn test_subscriber_removed_mid_delivery_still_gets_message() {
    let broker = Arc::new(Broker::new());
    let topic = Topic::from("T");
    let (rec_b, sub_b) = recorder();

    // A removes B whenever it receives a message. Whichever of the two is
    // delivered first, B was registered at lookup and must get this publish.
    let inner_broker = broker.clone();
    let target = sub_b.clone();
    let sub_a = subscriber_fn(move |m| inner_broker.remove_subscription(&target, m.topic()));
    broker.add_subscription(sub_a, topic.clone());
    broker.add_subscription(sub_b.clone(), topic.clone());

    let report = broker.publish_message_reliable(&msg("T", "in-flight"));
    assert_eq!(report.delivered, 2);
    assert_eq!(rec_b.payloads(), vec!["in-flight"]);
    assert!(!broker.is_subscribed(&sub_b, &topic));

    broker.publish_message_reliable(&msg("T", "after"));
    assert_eq!(rec_b.payloads(), vec!["in-flight"]);
}
