/*-
 * Sasl-rs - a client side SASL authentification library
 * Copyright (C) 2021-2022  Aleksandr Morozov
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A delegate which receives diagnostic messages. Called with the
/// publisher name, the message level and the message text.
pub type DiagnosticDelegate = Rc<dyn Fn(&str, usize, &str)>;

struct Subscription
{
    /// Unique id of the subscription within one sender
    id: usize,

    /// The minimum level of message this subscriber desires to receive
    min_level: usize,

    /// The function to call to deliver messages to the subscriber
    delegate: DiagnosticDelegate,
}

struct SenderInner
{
    next_id: usize,
    subscriptions: Vec<Subscription>,
}

/// A named publisher of diagnostic messages with a subscriber list.
///
/// Every mechanism owns one instance. Delivery is synchronous and is
/// performed in subscription order. The instance is single threaded,
/// as are the mechanisms which own it.
pub struct DiagnosticsSender
{
    /// A name under which the messages are published
    name: &'static str,

    inner: Rc<RefCell<SenderInner>>,
}

/// A handle which terminates one subscription to a [DiagnosticsSender].
///
/// Calling [UnsubscribeHandle::unsubscribe] more than once is a no-op,
/// as is calling it after the sender was dropped.
pub struct UnsubscribeHandle
{
    inner: Weak<RefCell<SenderInner>>,
    id: usize,
}

impl UnsubscribeHandle
{
    pub
    fn unsubscribe(&self)
    {
        if let Some(inner) = self.inner.upgrade()
        {
            inner
                .borrow_mut()
                .subscriptions
                .retain(|sub| sub.id != self.id);
        }
    }
}

impl DiagnosticsSender
{
    pub
    fn new(name: &'static str) -> Self
    {
        return
            Self
            {
                name: name,
                inner:
                    Rc::new(
                        RefCell::new(
                            SenderInner{next_id: 0, subscriptions: Vec::new()}
                        )
                    ),
            };
    }

    /// Forms a new subscription to the messages published by this sender.
    ///
    /// # Arguments
    ///
    /// * `delegate` - a function to call to deliver messages to the
    ///                 subscriber.
    ///
    /// * `min_level` - the minimum level of message that this subscriber
    ///                 desires to receive.
    ///
    /// # Returns
    ///
    /// * [UnsubscribeHandle] - a handle which may be used to terminate
    ///                 the subscription.
    pub
    fn subscribe(&self, delegate: DiagnosticDelegate, min_level: usize) -> UnsubscribeHandle
    {
        let mut inner = self.inner.borrow_mut();

        let id = inner.next_id;
        inner.next_id += 1;

        inner.subscriptions.push(
            Subscription
            {
                id: id,
                min_level: min_level,
                delegate: delegate,
            }
        );

        return UnsubscribeHandle{inner: Rc::downgrade(&self.inner), id: id};
    }

    /// Publishes one message to every subscriber whose `min_level` does
    /// not exceed `level`.
    ///
    /// The delegates are cloned out of the list before delivery so a
    /// delegate may subscribe or unsubscribe from within the callback.
    pub
    fn send(&self, level: usize, message: &str)
    {
        let delegates: Vec<DiagnosticDelegate> =
            self.inner
                .borrow()
                .subscriptions
                .iter()
                .filter(|sub| level >= sub.min_level)
                .map(|sub| sub.delegate.clone())
                .collect();

        for delegate in delegates
        {
            delegate(self.name, level, message);
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn recorder(log: &Rc<RefCell<Vec<String>>>) -> DiagnosticDelegate
    {
        let log = log.clone();

        return
            Rc::new(
                move |name: &str, level: usize, message: &str|
                    log.borrow_mut().push(format!("{}[{}]: {}", name, level, message))
            );
    }

    #[test]
    fn delivers_in_subscription_order()
    {
        let log = Rc::new(RefCell::new(Vec::new()));

        let sender = DiagnosticsSender::new("Test");
        let _sub1 = sender.subscribe(recorder(&log), 0);
        let _sub2 = sender.subscribe(recorder(&log), 0);

        sender.send(0, "hello");

        assert_eq!(log.borrow().as_slice(), &["Test[0]: hello".to_string(), "Test[0]: hello".to_string()]);
    }

    #[test]
    fn min_level_filters()
    {
        let log = Rc::new(RefCell::new(Vec::new()));

        let sender = DiagnosticsSender::new("Test");
        let _sub = sender.subscribe(recorder(&log), 2);

        sender.send(1, "dropped");
        sender.send(2, "kept");
        sender.send(3, "kept too");

        assert_eq!(log.borrow().as_slice(), &["Test[2]: kept".to_string(), "Test[3]: kept too".to_string()]);
    }

    #[test]
    fn unsubscribe_is_idempotent()
    {
        let log = Rc::new(RefCell::new(Vec::new()));

        let sender = DiagnosticsSender::new("Test");
        let sub1 = sender.subscribe(recorder(&log), 0);
        let _sub2 = sender.subscribe(recorder(&log), 0);

        sub1.unsubscribe();
        sub1.unsubscribe();

        sender.send(0, "once");

        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn unsubscribe_after_sender_dropped()
    {
        let log = Rc::new(RefCell::new(Vec::new()));

        let sender = DiagnosticsSender::new("Test");
        let sub = sender.subscribe(recorder(&log), 0);

        drop(sender);

        sub.unsubscribe();
    }
}
