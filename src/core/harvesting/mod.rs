mod harvester;

#[cfg(test)]
mod tests;

pub use harvester::Harvester;
