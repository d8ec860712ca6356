//! Rule-based plant assistant.
//!
//! Replies come from an ordered keyword table: the message is lowercased
//! and the first rule with any keyword as a substring wins.  Unmatched
//! messages get a random fallback.  The reply is delivered after a random
//! "thinking" delay scheduled by the runtime.

use core::ops::Range;

use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

pub struct Rule {
    pub keywords: &'static [&'static str],
    pub response: &'static str,
}

/// Order matters: earlier rules shadow later ones.
pub const RULES: [Rule; 9] = [
    Rule {
        keywords: &["hello", "hi", "hey", "greeting"],
        response: "Hello! I'm here to help with all your plant care needs. Feel free to ask me about watering, diseases, fertilizing, or any other plant-related questions!",
    },
    Rule {
        keywords: &["water", "watering", "irrigation", "moisture"],
        response: "For watering, I recommend checking soil moisture first. Most plants prefer soil that's moist but not waterlogged. Water when the top inch of soil feels dry. The auto-watering system can help maintain optimal moisture levels automatically!",
    },
    Rule {
        keywords: &["disease", "sick", "problem", "spots", "yellow", "brown"],
        response: "Plant diseases can show various symptoms like yellowing leaves, brown spots, or wilting. I'd recommend using our Disease Detection feature to upload a photo for accurate diagnosis. Common issues include overwatering, fungal infections, or nutrient deficiencies.",
    },
    Rule {
        keywords: &["fertilizer", "fertilize", "nutrients", "feed"],
        response: "Plants need regular feeding! Use a balanced fertilizer (10-10-10 NPK) during growing season. Organic options like compost or worm castings are great too. Fertilize every 2-4 weeks in spring/summer, less in winter.",
    },
    Rule {
        keywords: &["light", "sun", "shade", "lighting"],
        response: "Light requirements vary by plant! Most houseplants prefer bright, indirect light. Avoid direct sunlight which can scorch leaves. If natural light is limited, consider grow lights. Signs of insufficient light include leggy growth and pale leaves.",
    },
    Rule {
        keywords: &["humidity", "air", "environment"],
        response: "Many plants love humidity! Aim for 40-60% relative humidity. You can increase humidity by grouping plants together, using a humidifier, or placing plants on pebble trays with water.",
    },
    Rule {
        keywords: &["temperature", "hot", "cold", "heat"],
        response: "Most houseplants prefer temperatures between 65-75°F (18-24°C). Avoid placing plants near heating vents, air conditioners, or drafty windows. Sudden temperature changes can stress plants.",
    },
    Rule {
        keywords: &["repot", "repotting", "pot", "container"],
        response: "Repot when roots are visible through drainage holes or circling the pot. Spring is the best time. Choose a pot 1-2 inches larger in diameter. Use well-draining potting mix and be gentle with roots.",
    },
    Rule {
        keywords: &["pruning", "trim", "cut", "deadhead"],
        response: "Regular pruning keeps plants healthy! Remove dead, damaged, or diseased parts first. Pinch or cut above nodes to encourage bushier growth. Clean tools with rubbing alcohol between plants to prevent disease spread.",
    },
];

pub const FALLBACKS: [&str; 4] = [
    "That's an interesting question! While I can provide general plant care advice, for specific issues, I'd recommend consulting with a local horticulturist or using our Disease Detection feature for visual diagnosis.",
    "I'd love to help with that! Can you provide more details about your plant's current condition, species, or the specific issue you're experiencing?",
    "Great question! For the most accurate advice, it would help to know more about your plant's environment, watering schedule, and any symptoms you've noticed.",
    "I'm here to help! While I can offer general guidance, remember that each plant is unique. Consider factors like your local climate, plant species, and current care routine when implementing any advice.",
];

pub const GREETING: &str = "Hello! I'm your PlantCareAI assistant. I can help you with plant care, disease identification, watering schedules, and more. What would you like to know?";

pub const QUICK_QUESTIONS: [&str; 4] = [
    "How often should I water my plants?",
    "My plant has yellow leaves, what's wrong?",
    "What's the best fertilizer for houseplants?",
    "How do I increase humidity for my plants?",
];

/// Canned response for `message`, if any rule matches.
pub fn match_rule(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| rule.response)
}

pub fn respond(message: &str, rng: &mut impl Rng) -> &'static str {
    match match_rule(message) {
        Some(response) => response,
        None => FALLBACKS.choose(rng).copied().unwrap_or(FALLBACKS[0]),
    }
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: u32,
    pub text: String,
    pub sender: Sender,
    /// Simulation time the message was appended.
    pub at_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// A reply is still pending; the message was not sent.
    Busy,
    /// Message appended; deliver the reply after `delay_ms`.
    Scheduled { delay_ms: u64 },
}

pub struct Conversation {
    messages: Vec<Message>,
    /// User text awaiting a reply.
    pending: Option<String>,
    next_id: u32,
}

impl Conversation {
    /// A new conversation holding only the greeting.
    pub fn new(now_ms: u64) -> Self {
        let mut c = Self {
            messages: Vec::new(),
            pending: None,
            next_id: 1,
        };
        c.push(GREETING.to_string(), Sender::Bot, now_ms);
        c
    }

    /// Send a user message.  `delay_range` bounds the reply delay (ms).
    pub fn send(
        &mut self,
        text: &str,
        now_ms: u64,
        delay_range: Range<u64>,
        rng: &mut impl Rng,
    ) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }
        if self.is_typing() {
            debug!("chat: reply pending, message not sent");
            return SendOutcome::Busy;
        }

        self.push(text.to_string(), Sender::User, now_ms);
        self.pending = Some(text.to_string());
        let delay_ms = rng.gen_range(delay_range);
        debug!("chat: reply in {} ms", delay_ms);
        SendOutcome::Scheduled { delay_ms }
    }

    /// Append the bot's reply to the pending message.  `None` when
    /// nothing was pending.
    pub fn deliver_reply(&mut self, now_ms: u64, rng: &mut impl Rng) -> Option<&Message> {
        let question = self.pending.take()?;
        let reply = respond(&question, rng);
        info!("chat: replied to {:?}", question);
        self.push(reply.to_string(), Sender::Bot, now_ms);
        self.messages.last()
    }

    pub fn is_typing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Quick questions are offered until the user says anything.
    pub fn quick_questions(&self) -> &'static [&'static str] {
        if self.messages.len() == 1 {
            &QUICK_QUESTIONS
        } else {
            &[]
        }
    }

    fn push(&mut self, text: String, sender: Sender, at_ms: u64) {
        self.messages.push(Message {
            id: self.next_id,
            text,
            sender,
            at_ms,
        });
        self.next_id += 1;
    }
}
