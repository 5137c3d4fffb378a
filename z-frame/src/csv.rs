//! Functions for writing CSV format.
//!
//! Records are written with a header row.
use csv::Writer;
use serde::Serialize;

/// Dump records to CSV string.
///
/// ```
/// use z_frame::{csv::dump_csv, Angles, Recorder};
///
/// let mut rec = Recorder::new(0.);
/// rec.record_if_due(0., &Angles::default(), Some("z1-up"));
/// let s = dump_csv(rec.samples()).unwrap();
/// assert!(s.starts_with("time,angle1,angle2,angle3,seat_pan,label\n"));
/// ```
pub fn dump_csv<I>(records: I) -> Result<String, Box<dyn std::error::Error>>
where
    I: IntoIterator,
    I::Item: Serialize,
{
    let mut w = Writer::from_writer(Vec::new());
    records.into_iter().try_for_each(|r| w.serialize(r))?;
    Ok(String::from_utf8(w.into_inner()?)?)
}
