use console::Style;
use imprep_core::pipeline::config::{DatasetConfig, ProcessingConfig};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_dataset_summary(config: &DatasetConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("imprep Dataset"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(14)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.root.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Categories"),
        s.value.apply_to(config.num_categories)
    );
    match config.output {
        Some(ref output) => println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.path.apply_to(output.display())
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.disabled.apply_to("not saved")
        ),
    }
    let order = match (config.shuffle, config.seed) {
        (false, _) => "sorted".to_string(),
        (true, Some(seed)) => format!("shuffled (seed {seed})"),
        (true, None) => "shuffled".to_string(),
    };
    println!(
        "  {:<14}{}",
        s.label.apply_to("Order"),
        s.value.apply_to(order)
    );
    println!();

    print_processing_section(&s, &config.processing);
}

fn print_processing_section(s: &Styles, processing: &ProcessingConfig) {
    println!("  {}", s.header.apply_to("Processing"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Color"),
        s.method.apply_to(processing.color_mode)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Mean"),
        flag(s, processing.subtract_mean)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Negate"),
        flag(s, processing.negate)
    );
    if processing.use_pca {
        println!(
            "    {:<12}{}",
            s.label.apply_to("PCA"),
            s.method.apply_to(processing.pca_target)
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("PCA"),
            s.disabled.apply_to("disabled")
        );
    }
    println!();

    let filters = processing.active_filters();
    if filters.is_empty() {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Filters"),
            s.disabled.apply_to("none")
        );
    } else {
        println!("  {}", s.header.apply_to("Filters"));
        for (i, filter) in filters.iter().enumerate() {
            println!(
                "    {}. {}",
                s.label.apply_to(i + 1),
                s.value.apply_to(filter)
            );
        }
    }
    println!();
}

fn flag(s: &Styles, on: bool) -> String {
    if on {
        s.value.apply_to("yes").to_string()
    } else {
        s.disabled.apply_to("no").to_string()
    }
}
