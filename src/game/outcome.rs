use crate::MatchId;
use crate::Score;
use crate::ScriptId;

/// one finished match, exactly as it appears as a results.csv row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub id: MatchId,
    pub script_a: ScriptId,
    pub script_b: ScriptId,
    pub score_a: Score,
    pub score_b: Score,
    pub ticks: usize,
}

impl Outcome {
    pub const HEADER: &'static str = "matchId,scriptA,scriptB,scoreA,scoreB,ticks";

    pub fn row(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.id, self.script_a, self.script_b, self.score_a, self.score_b, self.ticks
        )
    }
}

impl std::str::FromStr for Outcome {
    type Err = anyhow::Error;

    fn from_str(row: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = row.trim().split(',').collect();
        if fields.len() != 6 {
            anyhow::bail!("expected 6 result fields, got {}: '{}'", fields.len(), row);
        }
        Ok(Self {
            id: fields[0].parse()?,
            script_a: fields[1].parse()?,
            script_b: fields[2].parse()?,
            score_a: fields[3].parse()?,
            score_b: fields[4].parse()?,
            ticks: fields[5].parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_round_trip() {
        let outcome = Outcome {
            id: 42,
            script_a: 7,
            script_b: 19,
            score_a: -3,
            score_b: 11,
            ticks: 180,
        };
        assert_eq!(outcome.row(), "42,7,19,-3,11,180");
        assert_eq!(outcome.row().parse::<Outcome>().unwrap(), outcome);
    }

    #[test]
    fn junk_rows_are_rejected() {
        assert!("1,2,3".parse::<Outcome>().is_err());
        assert!("a,b,c,d,e,f".parse::<Outcome>().is_err());
    }
}
