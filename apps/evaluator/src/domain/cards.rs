//! Single-card deck used by the game.
//!
//! Every card is encoded as `rank + 0.25 * suit`, which gives 52 distinct
//! real values between 1.0 (deuce of diamonds) and 13.75 (ace of spades).
//! Comparing encoded values is the only showdown rule, so two cards can
//! never tie.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const RANKS: u8 = 13;
pub const SUITS: u8 = 4;
pub const DECK_SIZE: usize = (RANKS as usize) * (SUITS as usize);

/// Suit offsets in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Diamonds = 0,
    Clubs = 1,
    Hearts = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Diamonds, Suit::Clubs, Suit::Hearts, Suit::Spades];

    fn symbol(self) -> char {
        match self {
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }
}

/// A dealt card. Field order matters: the derived `Ord` compares rank first,
/// then suit, which is exactly the order of the encoded values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    rank: u8,
    suit: Suit,
}

impl Card {
    /// `rank` is 1-based: 1 is a deuce, 13 is an ace.
    pub fn new(rank: u8, suit: Suit) -> Option<Self> {
        (1..=RANKS).contains(&rank).then_some(Self { rank, suit })
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn suit(self) -> Suit {
        self.suit
    }

    /// The real-valued encoding strategies compare against.
    pub fn value(self) -> f64 {
        f64::from(self.rank) + 0.25 * f64::from(self.suit as u8)
    }

    pub fn from_value(value: f64) -> Option<Self> {
        let quarters = value * 4.0;
        if quarters.fract() != 0.0 || quarters < 4.0 {
            return None;
        }
        let quarters = quarters as u32;
        let suit = *Suit::ALL.get((quarters % 4) as usize)?;
        Card::new(u8::try_from(quarters / 4).ok()?, suit)
    }

    /// Number of cards in a full deck that rank strictly below this one.
    pub fn cards_below(self) -> usize {
        (usize::from(self.rank) - 1) * usize::from(SUITS) + self.suit as usize
    }

    fn rank_label(self) -> &'static str {
        match self.rank {
            1 => "2",
            2 => "3",
            3 => "4",
            4 => "5",
            5 => "6",
            6 => "7",
            7 => "8",
            8 => "9",
            9 => "T",
            10 => "J",
            11 => "Q",
            12 => "K",
            _ => "A",
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} ({})",
            self.rank_label(),
            self.suit.symbol(),
            self.value()
        )
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Card::from_value(value)
            .ok_or_else(|| serde::de::Error::custom(format!("not a card value: {value}")))
    }
}

/// All 52 cards in ascending order.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for rank in 1..=RANKS {
        for suit in Suit::ALL {
            deck.push(Card { rank, suit });
        }
    }
    deck
}

/// A shuffled deck that deals from the top.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards = full_deck();
        cards.shuffle(rng);
        Self { cards }
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}
