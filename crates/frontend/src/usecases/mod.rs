pub mod u508_bulk_product_create;
