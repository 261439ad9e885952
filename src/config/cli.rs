use clap::Subcommand;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the catalog
    Catalog,
    /// Put a product into the basket
    Add { id: String },
    /// Take a product out of the basket
    Remove { id: String },
    /// Show the basket
    Basket,
    /// Fill in the checkout forms and place the order
    Checkout {
        #[arg(long, default_value = "card")]
        payment: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
    },
}
