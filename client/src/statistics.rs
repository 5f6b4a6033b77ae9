//! Vote statistics derived from raw tallies.
//!
//! Percentages round half up (`floor(x + 0.5)`): 1 of 8 votes is 12.5% and
//! shows as 13%. Computed in integer arithmetic so the result never depends
//! on float representation.

use verdict_types::{OptionIndex, Poll};

/// Share of `total` that `votes` represents, as a whole percentage in `0..=100`.
///
/// `total == 0` yields 0. `votes > total` can only come from a malformed
/// tally and is clamped to 100.
pub fn percentage(votes: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let votes = u128::from(votes.min(total));
    let total = u128::from(total);
    // floor(votes / total * 100 + 0.5) == floor((200 * votes + total) / (2 * total))
    ((200 * votes + total) / (2 * total)) as u8
}

/// `"<votes> (<pct>%)"`, as shown next to each option.
pub fn format_tally(votes: u64, total: u64) -> String {
    format!("{votes} ({}%)", percentage(votes, total))
}

/// Display row for one option of a poll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionStat<'a> {
    pub index: OptionIndex,
    pub label: &'a str,
    pub votes: u64,
    pub percentage: u8,
}

impl OptionStat<'_> {
    pub fn tally(&self) -> String {
        format!("{} ({}%)", self.votes, self.percentage)
    }
}

/// One row per option, in ballot order.
pub fn option_stats(poll: &Poll) -> Vec<OptionStat<'_>> {
    poll.options
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let votes = poll.votes_for(index);
            OptionStat {
                index,
                label,
                votes,
                percentage: percentage(votes, poll.total_votes),
            }
        })
        .collect()
}

/// Indices of the options holding the most votes; empty while nobody voted.
pub fn leading_options(poll: &Poll) -> Vec<OptionIndex> {
    let max = (0..poll.options.len())
        .map(|i| poll.votes_for(i))
        .max()
        .unwrap_or(0);
    if max == 0 {
        return Vec::new();
    }
    (0..poll.options.len())
        .filter(|&i| poll.votes_for(i) == max)
        .collect()
}
