mod legislator;
pub use self::legislator::{Chamber, Legislator, Party};

mod bill;
pub use self::bill::{Amendment, Bill, BillId, BillType};

mod vote;
pub use self::vote::{Ballot, Position, VoteCategory, VoteEvent};

mod session;
pub use self::session::CongressSession;
