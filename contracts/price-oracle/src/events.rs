use commons::ROUND_UPDATED_TAG;
use concordium_std::*;

/// Tagged Custom event to be serialized for the event log.
#[derive(Debug)]
pub enum PriceOracleEvent {
    /// A new round was published.
    RoundUpdated(RoundUpdatedEvent),
}

#[derive(Debug, Serial)]
pub struct RoundUpdatedEvent {
    pub round_id: u64,
    pub answer: u64,
    pub updated_at: Timestamp,
}

impl Serial for PriceOracleEvent {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            PriceOracleEvent::RoundUpdated(event) => {
                out.write_u8(ROUND_UPDATED_TAG)?;
                event.serial(out)
            }
        }
    }
}
