/// Outbound ports (driven ports) - infrastructure interfaces.
///
/// These ports define the interfaces the application core uses to reach
/// external systems (upstream vulnerability databases, the report drawing
/// surface).
pub mod outbound;
